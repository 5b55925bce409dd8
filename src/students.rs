//! NDX student directory (mock)
//!
//! Read-only lookup table standing in for the NDX data-exchange service.
//! Subsidy eligibility and dietary restrictions come from here.

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub school_id: String,
    pub grade: u8,
    /// Whether the government meal subsidy applies to this student
    pub subsidy_eligible: bool,
    pub dietary_restrictions: Vec<String>,
}

/// Seeded student records, keyed by student id.
pub struct StudentDirectory {
    students: HashMap<String, Student>,
}

impl StudentDirectory {
    pub fn seeded() -> Self {
        let mut students = HashMap::new();
        for s in seed_students() {
            students.insert(s.student_id.clone(), s);
        }
        Self { students }
    }

    pub fn get(&self, student_id: &str) -> Option<&Student> {
        self.students.get(student_id)
    }
}

fn seed_students() -> Vec<Student> {
    vec![
        Student {
            student_id: "STU-2024-001".to_string(),
            name: "Kasun Perera".to_string(),
            school_id: "SCH-COL-042".to_string(),
            grade: 7,
            subsidy_eligible: true,
            dietary_restrictions: vec![],
        },
        Student {
            student_id: "STU-2024-002".to_string(),
            name: "Nimasha Fernando".to_string(),
            school_id: "SCH-COL-042".to_string(),
            grade: 9,
            subsidy_eligible: true,
            dietary_restrictions: vec!["vegetarian".to_string()],
        },
        Student {
            student_id: "STU-2024-003".to_string(),
            name: "Tharindu Silva".to_string(),
            school_id: "SCH-KAN-017".to_string(),
            grade: 11,
            subsidy_eligible: false,
            dietary_restrictions: vec!["no-peanuts".to_string()],
        },
        Student {
            student_id: "STU-2024-004".to_string(),
            name: "Ishara Jayawardena".to_string(),
            school_id: "SCH-KAN-017".to_string(),
            grade: 5,
            subsidy_eligible: true,
            dietary_restrictions: vec!["halal".to_string()],
        },
    ]
}

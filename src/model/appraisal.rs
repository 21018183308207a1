//! Annual appraisal form record and its fixed rating questions.

use serde::{Deserialize, Serialize};

use super::{lenient, Answer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppraisalForm {
    pub employee_name: Answer,
    pub job_title: Answer,
    pub appraisal_date: Answer,
    pub manager_name: Answer,

    #[serde(deserialize_with = "lenient")]
    pub ratings: Ratings,

    pub comments_manager: Answer,
    pub comments_employee: Answer,

    // Development / action plan
    pub training_needs: Answer,
    pub development_goals: Answer,
    pub support_required: Answer,
    pub next_review_date: Answer,

    pub employee_signature: Answer,
    pub manager_signature: Answer,
    pub sign_off_date: Answer,
}

impl AppraisalForm {
    pub fn person_name(&self) -> Option<&str> {
        self.employee_name.text()
    }

    pub fn has_comments(&self) -> bool {
        !(self.comments_manager.is_blank() && self.comments_employee.is_blank())
    }
}

/// The eight rated areas, each an A-E grade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ratings {
    pub client_care: Answer,
    pub care_standards: Answer,
    pub safety_health: Answer,
    pub medication_management: Answer,
    pub communication: Answer,
    pub responsiveness: Answer,
    pub professional_development: Answer,
    pub attendance: Answer,
}

impl Ratings {
    pub fn get(&self, key: RatingKey) -> &Answer {
        match key {
            RatingKey::ClientCare => &self.client_care,
            RatingKey::CareStandards => &self.care_standards,
            RatingKey::SafetyHealth => &self.safety_health,
            RatingKey::MedicationManagement => &self.medication_management,
            RatingKey::Communication => &self.communication,
            RatingKey::Responsiveness => &self.responsiveness,
            RatingKey::ProfessionalDevelopment => &self.professional_development,
            RatingKey::Attendance => &self.attendance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingKey {
    ClientCare,
    CareStandards,
    SafetyHealth,
    MedicationManagement,
    Communication,
    Responsiveness,
    ProfessionalDevelopment,
    Attendance,
}

impl RatingKey {
    pub const ALL: [RatingKey; 8] = [
        RatingKey::ClientCare,
        RatingKey::CareStandards,
        RatingKey::SafetyHealth,
        RatingKey::MedicationManagement,
        RatingKey::Communication,
        RatingKey::Responsiveness,
        RatingKey::ProfessionalDevelopment,
        RatingKey::Attendance,
    ];

    pub fn question(&self) -> &'static str {
        match self {
            RatingKey::ClientCare => "How well does the employee care for clients?",
            RatingKey::CareStandards => "How well does the employee follow care plans and standards?",
            RatingKey::SafetyHealth => "How well does the employee follow health and safety practice?",
            RatingKey::MedicationManagement => "How well does the employee manage medication?",
            RatingKey::Communication => "How well does the employee communicate with clients and colleagues?",
            RatingKey::Responsiveness => "How well does the employee respond to changing needs?",
            RatingKey::ProfessionalDevelopment => "How committed is the employee to professional development?",
            RatingKey::Attendance => "How reliable is the employee's attendance and punctuality?",
        }
    }

    /// Option labels for grades A to E.
    pub fn options(&self) -> [&'static str; 5] {
        match self {
            RatingKey::ClientCare => [
                "A - Provides outstanding, person-centred care",
                "B - Provides consistently good care",
                "C - Provides satisfactory care",
                "D - Care sometimes falls below the expected standard",
                "E - Care is unsatisfactory and needs urgent improvement",
            ],
            RatingKey::CareStandards => [
                "A - Always follows care plans and exceeds standards",
                "B - Follows care plans reliably",
                "C - Usually follows care plans",
                "D - Often needs reminders to follow care plans",
                "E - Does not follow care plans",
            ],
            RatingKey::SafetyHealth => [
                "A - Exemplary safe working practice",
                "B - Works safely",
                "C - Generally works safely",
                "D - Needs prompting on safe practice",
                "E - Unsafe practice observed",
            ],
            RatingKey::MedicationManagement => [
                "A - Medication handled accurately and confidently",
                "B - Medication handled accurately",
                "C - Minor recording issues",
                "D - Repeated medication errors",
                "E - Serious medication errors",
            ],
            RatingKey::Communication => [
                "A - Excellent communicator",
                "B - Communicates well",
                "C - Communicates adequately",
                "D - Communication needs improvement",
                "E - Communication is poor",
            ],
            RatingKey::Responsiveness => [
                "A - Anticipates and responds to needs",
                "B - Responds well to changing needs",
                "C - Responds adequately",
                "D - Slow to respond",
                "E - Does not respond to changing needs",
            ],
            RatingKey::ProfessionalDevelopment => [
                "A - Actively seeks development",
                "B - Completes all required training",
                "C - Completes most required training",
                "D - Training frequently overdue",
                "E - Does not engage with training",
            ],
            RatingKey::Attendance => [
                "A - Excellent attendance and punctuality",
                "B - Good attendance and punctuality",
                "C - Acceptable attendance",
                "D - Attendance is a concern",
                "E - Attendance is unacceptable",
            ],
        }
    }
}

/// A rating grade, A best and E worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// Parse a stored rating: "E", "e", or a label starting with the letter.
    pub fn parse(answer: &Answer) -> Option<Grade> {
        let text = answer.text()?;
        let first = text.chars().next()?.to_ascii_uppercase();
        let rest = &text[first.len_utf8()..];
        if !(rest.is_empty() || rest.starts_with(&[' ', '-', ')', '.'][..])) {
            return None;
        }
        match first {
            'A' => Some(Grade::A),
            'B' => Some(Grade::B),
            'C' => Some(Grade::C),
            'D' => Some(Grade::D),
            'E' => Some(Grade::E),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

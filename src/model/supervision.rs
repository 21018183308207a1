//! Supervision form record.

use serde::{Deserialize, Serialize};

use super::{lenient, lenient_list, Answer, Choice};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupervisionForm {
    pub employee_name: Answer,
    pub supervisor_name: Answer,
    pub date_of_supervision: Answer,
    pub employee_signature: Answer,
    pub supervisor_signature: Answer,

    // General discussion
    pub how_are_you: Answer,
    pub workload: Answer,
    pub training_needs: Answer,
    pub proud_of: Answer,
    pub concerns_raised: Answer,
    pub policy_changes: Answer,
    pub annual_leave_taken: Answer,
    pub annual_leave_booked: Answer,
    pub other_issues: Answer,

    #[serde(deserialize_with = "lenient_list")]
    pub per_service_user: Vec<ServiceUserReview>,

    #[serde(deserialize_with = "lenient")]
    pub office_use: OfficeUse,
}

impl SupervisionForm {
    pub fn person_name(&self) -> Option<&str> {
        self.employee_name.text()
    }

    /// (title, answer) of the general discussion questions, in form order.
    pub fn discussion(&self) -> [(&'static str, &Answer); 9] {
        [
            ("How are you getting on?", &self.how_are_you),
            ("How is your workload?", &self.workload),
            ("Training needs", &self.training_needs),
            ("What are you most proud of since your last supervision?", &self.proud_of),
            ("Concerns raised", &self.concerns_raised),
            ("Policy or procedure changes discussed", &self.policy_changes),
            ("Annual leave taken", &self.annual_leave_taken),
            ("Annual leave booked", &self.annual_leave_booked),
            ("Other issues", &self.other_issues),
        ]
    }
}

/// Per service user section of a supervision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceUserReview {
    pub service_user_name: Answer,
    pub concerns: Answer,
    pub comfortable: Answer,
    pub comments: Answer,
    pub complaints: Answer,
    pub safeguarding: Answer,
    pub other_issues: Answer,
    pub bruises: Choice,
    pub bruises_causes: Answer,
    pub pressure_sores: Choice,
    pub pressure_sores_causes: Answer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfficeUse {
    pub reviewed_by: Answer,
    pub review_date: Answer,
    pub action_required: Answer,
    pub next_supervision_date: Answer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_users_parse_with_choice_objects() {
        let form: SupervisionForm = serde_json::from_str(
            r#"{
                "employeeName": "Sam Carer",
                "perServiceUser": [
                    {"serviceUserName": "A", "bruises": {"value": "yes"}, "bruisesCauses": "Fall"},
                    {"serviceUserName": "B", "bruises": {"value": "no"}},
                    {"serviceUserName": "C"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(form.person_name(), Some("Sam Carer"));
        assert_eq!(form.per_service_user.len(), 3);
        assert!(form.per_service_user[0].bruises.value.is_yes());
        assert!(!form.per_service_user[1].bruises.value.is_yes());
        assert!(form.per_service_user[2].bruises.value.is_blank());
    }
}

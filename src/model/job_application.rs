//! Job application form record.

use serde::{Deserialize, Serialize};

use super::{lenient, lenient_list, Answer, Entries};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplication {
    #[serde(deserialize_with = "lenient")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "lenient")]
    pub availability: Availability,
    #[serde(deserialize_with = "lenient")]
    pub emergency_contact: EmergencyContact,
    #[serde(deserialize_with = "lenient")]
    pub employment_history: EmploymentHistory,
    #[serde(deserialize_with = "lenient_list")]
    pub references: Vec<Referee>,
    #[serde(deserialize_with = "lenient")]
    pub skills_experience: SkillsExperience,
    #[serde(deserialize_with = "lenient")]
    pub declaration: Declaration,
    #[serde(deserialize_with = "lenient")]
    pub terms_policy: TermsPolicy,
}

impl JobApplication {
    /// Applicant name used in the file name.
    pub fn person_name(&self) -> Option<&str> {
        self.personal_info.full_name.text()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub title: Answer,
    pub full_name: Answer,
    pub email: Answer,
    pub telephone: Answer,
    pub date_of_birth: Answer,
    pub street_address: Answer,
    pub street_address2: Answer,
    pub town: Answer,
    pub borough: Answer,
    pub postcode: Answer,
    pub national_insurance_number: Answer,
    pub position_applied_for: Answer,
    pub english_proficiency: Answer,
    #[serde(deserialize_with = "lenient_list")]
    pub other_languages: Vec<Answer>,
    #[serde(rename = "hasDBS")]
    pub has_dbs: Answer,
    pub has_car_and_license: Answer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    /// Time slot label to the days it is available on.
    pub time_slots: Entries<Vec<Answer>>,
    pub hours_per_week: Answer,
    pub has_right_to_work: Answer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub full_name: Answer,
    pub relationship: Answer,
    pub contact_number: Answer,
    pub how_did_you_hear: Answer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmploymentHistory {
    pub previously_employed: Answer,
    #[serde(deserialize_with = "lenient")]
    pub recent_employer: Option<Employer>,
    #[serde(deserialize_with = "lenient_list")]
    pub previous_employers: Vec<Employer>,
}

impl EmploymentHistory {
    /// Most recent employer first, then the rest in form order.
    pub fn employers(&self) -> impl Iterator<Item = &Employer> {
        self.recent_employer
            .iter()
            .chain(self.previous_employers.iter())
            .filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employer {
    pub company: Answer,
    pub name: Answer,
    pub email: Answer,
    pub position: Answer,
    pub address: Answer,
    pub address2: Answer,
    pub town: Answer,
    pub postcode: Answer,
    pub telephone: Answer,
    pub from: Answer,
    pub to: Answer,
    pub responsibilities: Answer,
    pub reason_for_leaving: Answer,
}

impl Employer {
    pub fn is_empty(&self) -> bool {
        [
            &self.company,
            &self.name,
            &self.position,
            &self.from,
            &self.to,
            &self.responsibilities,
            &self.reason_for_leaving,
        ]
        .iter()
        .all(|a| a.is_blank())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Referee {
    pub name: Answer,
    pub company: Answer,
    pub job_title: Answer,
    pub email: Answer,
    pub address: Answer,
    pub town: Answer,
    pub postcode: Answer,
    pub contact_number: Answer,
}

impl Referee {
    pub fn is_empty(&self) -> bool {
        self.name.is_blank() && self.company.is_blank() && self.email.is_blank()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsExperience {
    /// Skill name to self-assessed level.
    pub skills: Entries<Answer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Declaration {
    pub social_service_enquiry: Answer,
    pub social_service_details: Answer,
    pub convicted_of_offence: Answer,
    pub convicted_details: Answer,
    pub safeguarding_investigation: Answer,
    pub safeguarding_details: Answer,
    pub criminal_convictions: Answer,
    pub criminal_details: Answer,
    pub health_conditions: Answer,
    pub health_details: Answer,
    pub cautions_reprimands: Answer,
    pub cautions_details: Answer,
}

impl Declaration {
    /// (question, answer, details) in form order.
    pub fn questions(&self) -> [(&'static str, &Answer, &Answer); 6] {
        [
            (
                "Has any social service organisation ever made enquiries about you?",
                &self.social_service_enquiry,
                &self.social_service_details,
            ),
            (
                "Have you ever been convicted of a criminal offence?",
                &self.convicted_of_offence,
                &self.convicted_details,
            ),
            (
                "Have you ever been the subject of a safeguarding investigation?",
                &self.safeguarding_investigation,
                &self.safeguarding_details,
            ),
            (
                "Do you have any unspent criminal convictions?",
                &self.criminal_convictions,
                &self.criminal_details,
            ),
            (
                "Do you have any health conditions that may affect your work?",
                &self.health_conditions,
                &self.health_details,
            ),
            (
                "Have you received any cautions, reprimands or final warnings?",
                &self.cautions_reprimands,
                &self.cautions_details,
            ),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermsPolicy {
    pub consent_to_terms: Answer,
    pub signature_full_name: Answer,
    pub date: Answer,
}

//! Job application summary.

use crate::error::Result;
use crate::layout::{ContentItem, HeaderAlign, RenderedDocument, SectionRenderer};
use crate::model::job_application::{Employer, JobApplication, Referee};
use crate::model::Answer;

use super::{open_document, serialize, GeneratedReport, ReportContext, ReportKind};

const KIND: ReportKind = ReportKind::JobApplication;

pub fn build(form: &JobApplication, ctx: &ReportContext) -> Result<GeneratedReport> {
    let doc = render(form, ctx);
    serialize(KIND, &doc, ctx, form.person_name())
}

/// Lay out the report without serialising it.
pub fn render(form: &JobApplication, ctx: &ReportContext) -> RenderedDocument {
    let mut r = open_document(KIND, ctx, HeaderAlign::Center, form.person_name());
    personal_information(&mut r, form);
    availability(&mut r, form);
    emergency_contact(&mut r, form);
    employment_history(&mut r, form);
    references(&mut r, form);
    skills(&mut r, form);
    declaration(&mut r, form);
    terms(&mut r, form);
    r.finish()
}

fn personal_information(r: &mut SectionRenderer, form: &JobApplication) {
    let p = &form.personal_info;
    let address = join(&[&p.street_address, &p.street_address2]);
    let languages = p
        .other_languages
        .iter()
        .filter_map(Answer::text)
        .collect::<Vec<_>>()
        .join(", ");

    r.section_title("Personal Information");
    r.two_column_row(&[
        ("Title", p.title.text()),
        ("Full name", p.full_name.text()),
        ("Email", p.email.text()),
        ("Telephone", p.telephone.text()),
        ("Date of birth", p.date_of_birth.text()),
        ("NI number", p.national_insurance_number.text()),
        ("Address", address.as_deref()),
        ("Town", p.town.text()),
        ("Borough", p.borough.text()),
        ("Postcode", p.postcode.text()),
        ("Position applied for", p.position_applied_for.text()),
        ("English proficiency", p.english_proficiency.text()),
        ("Other languages", Some(languages.as_str()).filter(|l| !l.is_empty())),
        ("DBS certificate", p.has_dbs.text()),
        ("Car and licence", p.has_car_and_license.text()),
    ]);
}

fn availability(r: &mut SectionRenderer, form: &JobApplication) {
    let a = &form.availability;
    r.section_title("Availability");

    let rows: Vec<Vec<String>> = a
        .time_slots
        .iter()
        .filter_map(|(slot, days)| {
            let days: Vec<&str> = days.iter().filter_map(Answer::text).collect();
            (!days.is_empty()).then(|| vec![slot.clone(), days.join(", ")])
        })
        .collect();
    if rows.is_empty() {
        r.note("No time slots selected");
    } else {
        r.table(&["Time slot", "Days"], &rows, &[0.35, 0.65]);
    }
    r.key_value("Hours per week", a.hours_per_week.text());
    r.key_value("Right to work in the UK", a.has_right_to_work.text());
}

fn emergency_contact(r: &mut SectionRenderer, form: &JobApplication) {
    let e = &form.emergency_contact;
    r.section_title("Emergency Contact");
    r.key_value("Full name", e.full_name.text());
    r.key_value("Relationship", e.relationship.text());
    r.key_value("Contact number", e.contact_number.text());
    r.key_value("How did you hear about us?", e.how_did_you_hear.text());
}

fn employment_history(r: &mut SectionRenderer, form: &JobApplication) {
    let history = &form.employment_history;
    r.section_title("Employment History");
    r.key_value(
        "Have you been previously employed?",
        history.previously_employed.text(),
    );
    for (i, employer) in history.employers().enumerate() {
        r.boxed(&employer_items(i, employer));
    }
}

fn employer_items(index: usize, e: &Employer) -> Vec<ContentItem> {
    let heading = match e.company.text() {
        Some(company) => company.to_string(),
        None => format!("Employer {}", index + 1),
    };
    let address = join(&[&e.address, &e.address2, &e.town, &e.postcode]);
    let period = match (e.from.text(), e.to.text()) {
        (None, None) => None,
        (from, to) => Some(format!("{} to {}", from.unwrap_or("?"), to.unwrap_or("present"))),
    };
    vec![
        ContentItem::label(heading),
        ContentItem::key_value("Contact name", e.name.text()),
        ContentItem::key_value("Email", e.email.text()),
        ContentItem::key_value("Telephone", e.telephone.text()),
        ContentItem::key_value("Address", address.as_deref()),
        ContentItem::key_value("Position", e.position.text()),
        ContentItem::key_value("Employed", period.as_deref()),
        ContentItem::key_value("Responsibilities", e.responsibilities.text()),
        ContentItem::key_value("Reason for leaving", e.reason_for_leaving.text()),
    ]
}

fn references(r: &mut SectionRenderer, form: &JobApplication) {
    r.section_title("References");
    let referees: Vec<&Referee> = form.references.iter().filter(|f| !f.is_empty()).collect();
    if referees.is_empty() {
        r.note("No references provided");
        return;
    }
    for (i, referee) in referees.into_iter().enumerate() {
        let address = join(&[&referee.address, &referee.town, &referee.postcode]);
        r.boxed(&[
            ContentItem::label(format!("Reference {}", i + 1)),
            ContentItem::key_value("Name", referee.name.text()),
            ContentItem::key_value("Company", referee.company.text()),
            ContentItem::key_value("Job title", referee.job_title.text()),
            ContentItem::key_value("Email", referee.email.text()),
            ContentItem::key_value("Contact number", referee.contact_number.text()),
            ContentItem::key_value("Address", address.as_deref()),
        ]);
    }
}

fn skills(r: &mut SectionRenderer, form: &JobApplication) {
    r.section_title("Skills & Experience");
    let rows: Vec<Vec<String>> = form
        .skills_experience
        .skills
        .iter()
        .filter_map(|(skill, level)| level.text().map(|l| vec![skill.clone(), l.to_string()]))
        .collect();
    if rows.is_empty() {
        r.note("No skills recorded");
    } else {
        r.table(&["Skill", "Level"], &rows, &[0.7, 0.3]);
    }
}

fn declaration(r: &mut SectionRenderer, form: &JobApplication) {
    r.section_title("Declaration");
    for (question, answer, details) in form.declaration.questions() {
        r.key_value(question, answer.text());
        r.paragraph("Details", details.text());
    }
}

fn terms(r: &mut SectionRenderer, form: &JobApplication) {
    let t = &form.terms_policy;
    r.section_title("Terms & Policy");
    r.label("I confirm that the information in this application is true and complete.");
    r.key_value("Consent to terms and privacy policy", t.consent_to_terms.text());
    r.key_value("Signature (full name)", t.signature_full_name.text());
    r.key_value("Date", t.date.text());
}

/// Non-blank answers joined with commas.
fn join(parts: &[&Answer]) -> Option<String> {
    let parts: Vec<&str> = parts.iter().filter_map(|a| a.text()).collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

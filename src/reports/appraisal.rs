//! Annual appraisal.

use crate::error::Result;
use crate::layout::{HeaderAlign, RenderedDocument, SectionRenderer};
use crate::model::appraisal::{AppraisalForm, Grade, RatingKey};
use crate::style::Color;

use super::{open_document, serialize, GeneratedReport, ReportContext, ReportKind};

const KIND: ReportKind = ReportKind::AnnualAppraisal;

const NOT_RATED: &str = "Not rated";

pub fn build(form: &AppraisalForm, ctx: &ReportContext) -> Result<GeneratedReport> {
    let doc = render(form, ctx);
    serialize(KIND, &doc, ctx, form.person_name())
}

pub fn render(form: &AppraisalForm, ctx: &ReportContext) -> RenderedDocument {
    let mut r = open_document(KIND, ctx, HeaderAlign::Left, form.person_name());

    r.section_title("Employee Details");
    r.two_column_row(&[
        ("Employee", form.employee_name.text()),
        ("Job title", form.job_title.text()),
        ("Appraisal date", form.appraisal_date.text()),
        ("Manager", form.manager_name.text()),
    ]);

    ratings(&mut r, form);

    if form.has_comments() {
        r.section_title("Comments");
        r.paragraph("Manager's comments", form.comments_manager.text());
        r.paragraph("Employee's comments", form.comments_employee.text());
    }

    r.section_title("Action Plan");
    r.paragraph("Training needs", form.training_needs.text());
    r.paragraph("Development goals", form.development_goals.text());
    r.paragraph("Support required", form.support_required.text());
    r.key_value("Next review date", form.next_review_date.text());

    r.section_title("Sign-off");
    r.key_value("Employee signature", form.employee_signature.text());
    r.key_value("Manager signature", form.manager_signature.text());
    r.key_value("Date", form.sign_off_date.text());

    r.finish()
}

fn ratings(r: &mut SectionRenderer, form: &AppraisalForm) {
    r.section_title("Performance Ratings");
    let muted = r.document().style().muted_color;
    for key in RatingKey::ALL {
        match Grade::parse(form.ratings.get(key)) {
            Some(grade) => r.rating(key.question(), key.options()[grade.index()], grade_color(grade)),
            None => r.rating(key.question(), NOT_RATED, muted),
        }
    }
}

/// Green for the best grade through to red for the worst.
pub fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::A => Color::hex("#16a34a"),
        Grade::B => Color::hex("#65a30d"),
        Grade::C => Color::hex("#ca8a04"),
        Grade::D => Color::hex("#ea580c"),
        Grade::E => Color::hex("#dc2626"),
    }
}

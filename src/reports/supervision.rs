//! Supervision record.

use crate::error::Result;
use crate::layout::{ContentItem, HeaderAlign, RenderedDocument, SectionRenderer};
use crate::model::supervision::{ServiceUserReview, SupervisionForm};

use super::{open_document, serialize, GeneratedReport, ReportContext, ReportKind};

const KIND: ReportKind = ReportKind::Supervision;

pub fn build(form: &SupervisionForm, ctx: &ReportContext) -> Result<GeneratedReport> {
    let doc = render(form, ctx);
    serialize(KIND, &doc, ctx, form.person_name())
}

pub fn render(form: &SupervisionForm, ctx: &ReportContext) -> RenderedDocument {
    let mut r = open_document(KIND, ctx, HeaderAlign::Left, form.person_name());

    r.section_title("Supervision Details");
    r.two_column_row(&[
        ("Employee", form.employee_name.text()),
        ("Supervisor", form.supervisor_name.text()),
        ("Date of supervision", form.date_of_supervision.text()),
        ("Employee signature", form.employee_signature.text()),
        ("Supervisor signature", form.supervisor_signature.text()),
    ]);

    r.section_title("General Discussion");
    let discussion = form.discussion();
    if discussion.iter().all(|(_, answer)| answer.is_blank()) {
        r.note("No discussion recorded");
    }
    for (title, answer) in discussion {
        r.paragraph(title, answer.text());
    }

    service_users(&mut r, &form.per_service_user);

    let office = &form.office_use;
    r.section_title("Office Use Only");
    r.key_value("Reviewed by", office.reviewed_by.text());
    r.key_value("Review date", office.review_date.text());
    r.key_value("Action required", office.action_required.text());
    r.key_value("Next supervision date", office.next_supervision_date.text());

    r.finish()
}

fn service_users(r: &mut SectionRenderer, reviews: &[ServiceUserReview]) {
    r.section_title("Service Users");
    if reviews.is_empty() {
        r.note("No service users discussed");
        return;
    }
    for (i, review) in reviews.iter().enumerate() {
        r.boxed(&review_items(i, review));
    }
}

fn review_items(index: usize, review: &ServiceUserReview) -> Vec<ContentItem> {
    let heading = match review.service_user_name.text() {
        Some(name) => name.to_string(),
        None => format!("Service user {}", index + 1),
    };
    let mut items = vec![
        ContentItem::label(heading),
        ContentItem::key_value("Any concerns?", review.concerns.text()),
        ContentItem::key_value("Comfortable working with them?", review.comfortable.text()),
        ContentItem::key_value("Comments", review.comments.text()),
        ContentItem::key_value("Complaints", review.complaints.text()),
        ContentItem::key_value("Safeguarding", review.safeguarding.text()),
        ContentItem::key_value("Other issues", review.other_issues.text()),
        ContentItem::key_value("Bruises", review.bruises.value.text()),
    ];
    // Causes are only asked for when the answer was yes.
    if review.bruises.value.is_yes() {
        items.push(ContentItem::key_value(
            "Causes of bruises",
            review.bruises_causes.text(),
        ));
    }
    items.push(ContentItem::key_value(
        "Pressure sores",
        review.pressure_sores.value.text(),
    ));
    if review.pressure_sores.value.is_yes() {
        items.push(ContentItem::key_value(
            "Causes of pressure sores",
            review.pressure_sores_causes.text(),
        ));
    }
    items
}

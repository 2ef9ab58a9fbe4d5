// src/services/export_service.rs

use chrono::NaiveDate;

use crate::models::lead::Lead;

// ---
// EXPORTAÇÃO CSV
// Gera o arquivo sobre o conjunto filtrado e ordenado (nunca paginado).
// Cabeçalho fixo, sempre presente, e todo campo entre aspas duplas.
// ---

pub const CSV_HEADER: [&str; 11] = [
    "Name",
    "Phone",
    "Email",
    "Status",
    "Source",
    "Location",
    "Budget",
    "Requirements",
    "Timeline",
    "Assigned To",
    "Created Date",
];

pub fn export_filename(today: NaiveDate) -> String {
    format!("leads-export-{}.csv", today.format("%Y-%m-%d"))
}

pub fn render_csv(leads: &[Lead]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

    for lead in leads {
        push_row(
            &mut out,
            [
                lead.display_name().to_string(),
                lead.phone.clone().unwrap_or_default(),
                lead.email.clone().unwrap_or_default(),
                lead.status.as_str().to_string(),
                lead
                    .lead_source
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
                lead.location.clone().unwrap_or_default(),
                lead.budget.clone().unwrap_or_default(),
                lead.requirements.clone().unwrap_or_default(),
                lead.timeline.clone().unwrap_or_default(),
                lead.assigned_to.clone().unwrap_or_default(),
                lead
                    .created_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default(),
            ]
            .into_iter(),
        );
    }

    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let quoted: Vec<String> = fields
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect();
    out.push_str(&quoted.join(","));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::{LeadSource, LeadStatus};

    fn lead(name: &str) -> Lead {
        Lead {
            id: "1".into(),
            lead_name: Some(name.to_string()),
            name: None,
            phone: Some("119".into()),
            email: None,
            status: LeadStatus::New,
            contact_status: None,
            lead_source: Some(LeadSource::Website),
            assigned_to: Some("a@x.com".into()),
            notes: None,
            fb_page_id: None,
            fb_form_id: None,
            fb_created_time: None,
            next_follow_up: None,
            last_contact_date: None,
            created_date: None,
            is_cold: false,
            location: None,
            budget: None,
            requirements: None,
            timeline: None,
        }
    }

    #[test]
    fn header_is_present_even_without_rows() {
        let csv = render_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("\"Name\",\"Phone\""));
    }

    #[test]
    fn row_count_matches_collection_size() {
        let leads = vec![lead("a"), lead("b"), lead("c")];
        let csv = render_csv(&leads);
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn every_field_is_quoted_and_inner_quotes_doubled() {
        let mut tricky = lead("Maria \"Mimi\" Silva");
        tricky.location = Some("São Paulo, SP".into());
        let csv = render_csv(&[tricky]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"Maria \"\"Mimi\"\" Silva\""));
        assert!(row.contains("\"São Paulo, SP\""));
        assert_eq!(row.matches('"').count() % 2, 0);
    }

    #[test]
    fn filename_embeds_the_iso_date() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(export_filename(day), "leads-export-2026-08-08.csv");
    }
}

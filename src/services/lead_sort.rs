// src/services/lead_sort.rs

use std::cmp::Ordering;

use crate::models::filters::{SortDirection, SortField};
use crate::models::lead::Lead;

// ---
// MOTOR DE ORDENAÇÃO
// Ordenação estável; strings comparam sem caixa e valor ausente colaciona
// como string vazia (portanto primeiro na ordem ascendente). O estágio do
// funil usa a tabela de ranks explícita, não a ordem alfabética.
// ---

pub fn sort_leads(leads: &mut [Lead], field: SortField, direction: SortDirection) {
    leads.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Clicar no campo já ativo inverte a direção; um campo novo volta para
/// ascendente.
pub fn toggle_sort(
    active_field: SortField,
    active_direction: SortDirection,
    clicked: SortField,
) -> (SortField, SortDirection) {
    if clicked == active_field {
        (active_field, active_direction.flipped())
    } else {
        (clicked, SortDirection::Asc)
    }
}

fn compare(a: &Lead, b: &Lead, field: SortField) -> Ordering {
    match field {
        SortField::Name => text_key(a.display_name()).cmp(&text_key(b.display_name())),
        SortField::FormName => text_key(&a.form_name()).cmp(&text_key(&b.form_name())),
        SortField::Status => a.status.rank().cmp(&b.status.rank()),
        SortField::ContactStatus => opt_text(a.contact_status.map(|c| c.as_str()))
            .cmp(&opt_text(b.contact_status.map(|c| c.as_str()))),
        SortField::LeadSource => opt_text(a.lead_source.map(|s| s.as_str()))
            .cmp(&opt_text(b.lead_source.map(|s| s.as_str()))),
        SortField::AssignedTo => {
            opt_text(a.assigned_to.as_deref()).cmp(&opt_text(b.assigned_to.as_deref()))
        }
        SortField::Phone => opt_text(a.phone.as_deref()).cmp(&opt_text(b.phone.as_deref())),
        SortField::Email => opt_text(a.email.as_deref()).cmp(&opt_text(b.email.as_deref())),
        // Datas ausentes (None) vêm antes de qualquer data na ordem
        // ascendente, espelhando a colação de string vazia.
        SortField::CreatedDate => a.created_date.cmp(&b.created_date),
        SortField::NextFollowUp => a.next_follow_up.cmp(&b.next_follow_up),
        SortField::LastContactDate => a.last_contact_date.cmp(&b.last_contact_date),
    }
}

fn text_key(value: &str) -> String {
    value.to_lowercase()
}

fn opt_text(value: Option<&str>) -> String {
    value.unwrap_or("").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::LeadStatus;
    use chrono::{TimeZone, Utc};

    fn lead(id: &str, status: LeadStatus) -> Lead {
        Lead {
            id: id.to_string(),
            lead_name: None,
            name: None,
            phone: None,
            email: None,
            status,
            contact_status: None,
            lead_source: None,
            assigned_to: None,
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
    fn status_sorts_by_pipeline_rank_not_lexically() {
        let mut leads = vec![
            lead("1", LeadStatus::Contacted),
            lead("2", LeadStatus::New),
            lead("3", LeadStatus::New),
        ];
        sort_leads(&mut leads, SortField::Status, SortDirection::Asc);
        let statuses: Vec<&str> = leads.iter().map(|l| l.status.as_str()).collect();
        // Ordem alfabética daria ["contacted", "new", "new"].
        assert_eq!(statuses, vec!["new", "new", "contacted"]);
    }

    #[test]
    fn name_sort_is_case_insensitive_with_fallback() {
        let mut a = lead("1", LeadStatus::New);
        a.name = Some("zeca".into());
        let mut b = lead("2", LeadStatus::New);
        b.lead_name = Some("Ana".into());
        // lead_name tem precedência sobre name.
        b.name = Some("zzz".into());
        let mut c = lead("3", LeadStatus::New);

        let mut leads = vec![a, b, c];
        sort_leads(&mut leads, SortField::Name, SortDirection::Asc);
        let ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        // Sem nome colaciona como "" e vem primeiro.
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn descending_reverses_a_total_order() {
        let mut asc = vec![
            lead("1", LeadStatus::New),
            lead("2", LeadStatus::New),
            lead("3", LeadStatus::New),
        ];
        asc[0].email = Some("a@x.com".into());
        asc[1].email = Some("b@x.com".into());
        asc[2].email = Some("c@x.com".into());
        let mut desc = asc.clone();

        sort_leads(&mut asc, SortField::Email, SortDirection::Asc);
        sort_leads(&mut desc, SortField::Email, SortDirection::Desc);

        let asc_ids: Vec<&str> = asc.iter().map(|l| l.id.as_str()).collect();
        let mut desc_ids: Vec<&str> = desc.iter().map(|l| l.id.as_str()).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn missing_dates_come_first_ascending() {
        let mut a = lead("1", LeadStatus::New);
        a.created_date = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).single();
        let b = lead("2", LeadStatus::New);
        let mut c = lead("3", LeadStatus::New);
        c.created_date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single();

        let mut leads = vec![a, b, c];
        sort_leads(&mut leads, SortField::CreatedDate, SortDirection::Asc);
        let ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn toggle_flips_same_field_and_resets_new_field() {
        assert_eq!(
            toggle_sort(SortField::Name, SortDirection::Asc, SortField::Name),
            (SortField::Name, SortDirection::Desc)
        );
        assert_eq!(
            toggle_sort(SortField::Name, SortDirection::Desc, SortField::Status),
            (SortField::Status, SortDirection::Asc)
        );
    }
}

// src/services/lead_filter.rs

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::auth::CurrentUser;
use crate::models::filters::{AssignmentFilter, DateFilter, LeadQuery};
use crate::models::lead::{FORM_NAME_SENTINEL, Lead, LeadSource};

// ---
// MOTOR DE PREDICADO
// Um lead é visível sse passa em TODOS os filtros ativos (conjunção).
// Relaxar qualquer filtro para "all"/vazio nunca diminui o conjunto visível.
// ---

pub struct FilterContext<'a> {
    pub viewer: &'a CurrentUser,
    pub query: &'a LeadQuery,
    // Injetada para as faixas nomeadas serem determinísticas nos testes.
    pub today: NaiveDate,
}

pub fn lead_matches(lead: &Lead, ctx: &FilterContext) -> bool {
    let q = ctx.query;

    // 1. Filtros avançados: lista vazia = sem restrição naquela chave.
    if !q.adv_stage.is_empty() && !q.adv_stage.contains(&lead.status) {
        return false;
    }
    if !q.adv_source.is_empty() {
        match lead.lead_source {
            Some(source) if q.adv_source.contains(&source) => {}
            _ => return false,
        }
    }
    if !q.adv_assigned.is_empty() {
        match lead.assigned_to.as_deref() {
            Some(owner) if q.adv_assigned.iter().any(|a| a == owner) => {}
            _ => return false,
        }
    }

    // 2. Visibilidade por papel: não-admin só enxerga os próprios leads,
    // comparando e-mails aparados e sem caixa.
    if !ctx.viewer.is_admin() {
        let owner = lead
            .assigned_to
            .as_deref()
            .map(|o| o.trim().to_lowercase())
            .unwrap_or_default();
        if owner != ctx.viewer.normalized_email() {
            return false;
        }
    }

    // 3. Busca livre: nome OU telefone OU e-mail.
    if let Some(search) = q.search.as_deref() {
        let term = search.trim();
        if !term.is_empty() {
            let term_lower = term.to_lowercase();
            let name_hit = lead.display_name().to_lowercase().contains(&term_lower);
            let phone_hit = lead
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(term));
            let email_hit = lead
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&term_lower));
            if !(name_hit || phone_hit || email_hit) {
                return false;
            }
        }
    }

    // 4. Origem.
    if let Some(source) = q.source {
        if lead.lead_source != Some(source) {
            return false;
        }
    }

    // 5. Modo de atribuição.
    match q.assignment {
        AssignmentFilter::All => {}
        AssignmentFilter::MyLeads => {
            if lead.assigned_to.as_deref() != Some(ctx.viewer.email.as_str()) {
                return false;
            }
        }
        AssignmentFilter::Assigned => {
            if !has_owner(lead) {
                return false;
            }
        }
        AssignmentFilter::Unassigned => {
            if has_owner(lead) {
                return false;
            }
        }
    }

    // 6. Membro específico.
    if let Some(member) = q.member.as_deref() {
        if lead.assigned_to.as_deref() != Some(member) {
            return false;
        }
    }

    // 7. Estágio do funil.
    if let Some(status) = q.status {
        if lead.status != status {
            return false;
        }
    }

    // 8. Status de contato.
    if let Some(contact) = q.contact_status {
        if lead.contact_status != Some(contact) {
            return false;
        }
    }

    // 9. Período. Lead sem data de referência passa (fallback permissivo);
    // faixa custom sem início ou fim vira no-op e casa com tudo.
    if let Some((start, end)) = date_bounds(q, ctx.today) {
        if let Some(reference) = lead.reference_date() {
            let date = reference.date_naive();
            if date < start || date > end {
                return false;
            }
        }
    }

    // 10. Página/formulário do Facebook: só restringem leads do Facebook.
    if let Some(page_id) = q.fb_page.as_deref() {
        if lead.lead_source == Some(LeadSource::Facebook) {
            let marker = format!("Page ID: {page_id}");
            if !lead.notes.as_deref().is_some_and(|n| n.contains(&marker)) {
                return false;
            }
        }
    }
    if let Some(form_id) = q.fb_form.as_deref() {
        if lead.lead_source == Some(LeadSource::Facebook)
            && lead.fb_form_id.as_deref() != Some(form_id)
        {
            return false;
        }
    }

    // 11. Nome de formulário derivado das notas.
    if let Some(form_name) = q.form_name.as_deref() {
        if lead.form_name() != form_name {
            return false;
        }
    }

    true
}

pub fn filter_leads(leads: Vec<Lead>, ctx: &FilterContext) -> Vec<Lead> {
    leads
        .into_iter()
        .filter(|lead| lead_matches(lead, ctx))
        .collect()
}

/// Nomes de formulário distintos, sem o sentinela, para popular o filtro.
pub fn available_form_names(leads: &[Lead]) -> Vec<String> {
    leads
        .iter()
        .map(Lead::form_name)
        .filter(|name| name != FORM_NAME_SENTINEL)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// Atribuído "truthy": string presente e não vazia.
fn has_owner(lead: &Lead) -> bool {
    lead.assigned_to.as_deref().is_some_and(|o| !o.is_empty())
}

/// Resolve a faixa de datas (inclusiva) do filtro de período.
/// Retorna None quando não há restrição.
fn date_bounds(query: &LeadQuery, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match query.date_filter {
        DateFilter::All => None,
        DateFilter::Today => Some((today, today)),
        DateFilter::Yesterday => {
            let y = today.checked_sub_days(Days::new(1))?;
            Some((y, y))
        }
        DateFilter::Last7Days => Some((today.checked_sub_days(Days::new(6))?, today)),
        DateFilter::Last30Days => Some((today.checked_sub_days(Days::new(29))?, today)),
        DateFilter::ThisMonth => {
            let first = today.with_day(1)?;
            Some((first, today))
        }
        // Sem início ou fim a faixa custom não restringe nada.
        DateFilter::Custom => match (query.date_start, query.date_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::{ContactStatus, LeadStatus};
    use chrono::{TimeZone, Utc};

    fn base_lead(id: &str) -> Lead {
        Lead {
            id: id.to_string(),
            lead_name: None,
            name: None,
            phone: None,
            email: None,
            status: LeadStatus::New,
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

    fn admin() -> CurrentUser {
        CurrentUser {
            id: None,
            email: "admin@x.com".into(),
            full_name: None,
            role: Some("admin".into()),
            permissions: vec![],
        }
    }

    fn member(email: &str) -> CurrentUser {
        CurrentUser {
            id: None,
            email: email.into(),
            full_name: None,
            role: Some("user".into()),
            permissions: vec![],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
    }

    fn dataset() -> Vec<Lead> {
        let mut a = base_lead("1");
        a.lead_name = Some("Alice Prado".into());
        a.status = LeadStatus::New;
        a.assigned_to = Some("a@x.com".into());
        a.phone = Some("11999990000".into());

        let mut b = base_lead("2");
        b.name = Some("Bruno Costa".into());
        b.status = LeadStatus::Contacted;
        b.assigned_to = Some("b@x.com".into());
        b.email = Some("bruno@cliente.com".into());

        let mut c = base_lead("3");
        c.lead_name = Some("Carla Dias".into());
        c.status = LeadStatus::New;
        c.assigned_to = None;

        vec![a, b, c]
    }

    fn visible_ids(leads: Vec<Lead>, viewer: &CurrentUser, query: &LeadQuery) -> Vec<String> {
        let ctx = FilterContext {
            viewer,
            query,
            today: today(),
        };
        filter_leads(leads, &ctx)
            .into_iter()
            .map(|l| l.id)
            .collect()
    }

    #[test]
    fn admin_sees_only_unassigned_with_that_mode() {
        let mut query = LeadQuery::default();
        query.assignment = AssignmentFilter::Unassigned;
        assert_eq!(visible_ids(dataset(), &admin(), &query), vec!["3"]);
    }

    #[test]
    fn non_admin_only_sees_own_leads_regardless_of_filters() {
        let viewer = member("a@x.com");
        let query = LeadQuery::default();
        assert_eq!(visible_ids(dataset(), &viewer, &query), vec!["1"]);

        // Mesmo pedindo "unassigned", nada além dos próprios aparece.
        let mut strict = LeadQuery::default();
        strict.assignment = AssignmentFilter::Unassigned;
        assert!(visible_ids(dataset(), &viewer, &strict).is_empty());
    }

    #[test]
    fn ownership_comparison_ignores_case_and_spaces() {
        let mut lead = base_lead("9");
        lead.assigned_to = Some("  A@X.com ".into());
        let viewer = member("a@x.com");
        let query = LeadQuery::default();
        let ctx = FilterContext {
            viewer: &viewer,
            query: &query,
            today: today(),
        };
        assert!(lead_matches(&lead, &ctx));
    }

    #[test]
    fn search_hits_name_phone_or_email() {
        let mut query = LeadQuery::default();
        query.search = Some("prado".into());
        assert_eq!(visible_ids(dataset(), &admin(), &query), vec!["1"]);

        query.search = Some("11999".into());
        assert_eq!(visible_ids(dataset(), &admin(), &query), vec!["1"]);

        query.search = Some("BRUNO@cliente".into());
        assert_eq!(visible_ids(dataset(), &admin(), &query), vec!["2"]);

        // Busca vazia casa com tudo.
        query.search = Some("   ".into());
        assert_eq!(visible_ids(dataset(), &admin(), &query).len(), 3);
    }

    #[test]
    fn relaxing_any_filter_never_shrinks_the_visible_set() {
        let mut strict = LeadQuery::default();
        strict.status = Some(LeadStatus::New);
        strict.assignment = AssignmentFilter::Assigned;
        strict.adv_stage = vec![LeadStatus::New, LeadStatus::Contacted];
        strict.search = Some("a".into());

        let strict_count = visible_ids(dataset(), &admin(), &strict).len();

        for relax in 0..4 {
            let mut relaxed = strict.clone();
            match relax {
                0 => relaxed.status = None,
                1 => relaxed.assignment = AssignmentFilter::All,
                2 => relaxed.adv_stage = vec![],
                _ => relaxed.search = None,
            }
            let relaxed_count = visible_ids(dataset(), &admin(), &relaxed).len();
            assert!(relaxed_count >= strict_count);
        }
    }

    #[test]
    fn advanced_assigned_filter_is_membership() {
        let mut query = LeadQuery::default();
        query.adv_assigned = vec!["a@x.com".into(), "b@x.com".into()];
        assert_eq!(visible_ids(dataset(), &admin(), &query), vec!["1", "2"]);
    }

    #[test]
    fn contact_status_filter_is_exact() {
        let mut leads = dataset();
        leads[0].contact_status = Some(ContactStatus::FollowUp);
        let mut query = LeadQuery::default();
        query.contact_status = Some(ContactStatus::FollowUp);
        assert_eq!(visible_ids(leads, &admin(), &query), vec!["1"]);
    }

    #[test]
    fn date_filter_uses_fb_time_then_created_date() {
        let mut lead = base_lead("7");
        lead.created_date = Utc.with_ymd_and_hms(2026, 8, 8, 10, 0, 0).single();

        let mut query = LeadQuery::default();
        query.date_filter = DateFilter::Today;
        let viewer = admin();
        let ctx = FilterContext {
            viewer: &viewer,
            query: &query,
            today: today(),
        };
        assert!(lead_matches(&lead, &ctx));

        // fb_created_time fora da faixa tem precedência sobre created_date.
        lead.fb_created_time = Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).single();
        assert!(!lead_matches(&lead, &ctx));
    }

    #[test]
    fn missing_date_field_matches_permissively() {
        let lead = base_lead("7");
        let mut query = LeadQuery::default();
        query.date_filter = DateFilter::Last30Days;
        let viewer = admin();
        let ctx = FilterContext {
            viewer: &viewer,
            query: &query,
            today: today(),
        };
        assert!(lead_matches(&lead, &ctx));
    }

    #[test]
    fn custom_range_without_both_ends_matches_everything() {
        let mut lead = base_lead("7");
        lead.created_date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single();

        let mut query = LeadQuery::default();
        query.date_filter = DateFilter::Custom;
        query.date_start = Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        // date_end ausente: comportamento preservado, o filtro vira no-op.
        let viewer = admin();
        let ctx = FilterContext {
            viewer: &viewer,
            query: &query,
            today: today(),
        };
        assert!(lead_matches(&lead, &ctx));

        query.date_end = Some(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        let ctx = FilterContext {
            viewer: &viewer,
            query: &query,
            today: today(),
        };
        assert!(!lead_matches(&lead, &ctx));
    }

    #[test]
    fn facebook_filters_only_constrain_facebook_leads() {
        let mut fb = base_lead("fb");
        fb.lead_source = Some(LeadSource::Facebook);
        fb.notes = Some("Form: Promo\nPage ID: 123".into());
        fb.fb_form_id = Some("f-9".into());

        let mut walkin = base_lead("w");
        walkin.lead_source = Some(LeadSource::Walkin);

        let mut query = LeadQuery::default();
        query.fb_page = Some("123".into());
        query.fb_form = Some("f-9".into());
        assert_eq!(
            visible_ids(vec![fb.clone(), walkin.clone()], &admin(), &query),
            vec!["fb", "w"]
        );

        query.fb_page = Some("999".into());
        assert_eq!(visible_ids(vec![fb, walkin], &admin(), &query), vec!["w"]);
    }

    #[test]
    fn form_name_filter_matches_derived_value() {
        let mut lead = base_lead("1");
        lead.notes = Some("Form Name: Open House".into());
        let mut other = base_lead("2");
        other.notes = Some("sem formulário".into());

        let mut query = LeadQuery::default();
        query.form_name = Some("Open House".into());
        assert_eq!(visible_ids(vec![lead, other], &admin(), &query), vec!["1"]);
    }

    #[test]
    fn form_names_list_excludes_sentinel_and_dedupes() {
        let mut a = base_lead("1");
        a.notes = Some("Form Name: Open House".into());
        let mut b = base_lead("2");
        b.notes = Some("Form Name: Open House".into());
        let c = base_lead("3");

        assert_eq!(
            available_form_names(&[a, b, c]),
            vec!["Open House".to_string()]
        );
    }
}

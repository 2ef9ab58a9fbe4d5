// src/services/selection.rs

use std::collections::BTreeSet;

use crate::models::lead::Lead;

// ---
// SELEÇÃO EM LOTE
// O conjunto selecionado é sempre derivado do conjunto visível (filtrado e
// ordenado): "selecionar tudo" captura exatamente os ids visíveis — nunca o
// dataset inteiro — e qualquer pedido do cliente é interseccionado com o
// visível antes de uma ação em lote tocar o upstream.
// ---

pub fn select_all(visible: &[Lead]) -> BTreeSet<String> {
    visible.iter().map(|lead| lead.id.clone()).collect()
}

pub fn toggle(selection: &mut BTreeSet<String>, id: &str) {
    if !selection.remove(id) {
        selection.insert(id.to_string());
    }
}

/// Reimpõe o invariante de subconjunto depois de uma mudança de filtro.
pub fn retain_visible(selection: &mut BTreeSet<String>, visible: &[Lead]) {
    let visible_ids: BTreeSet<&str> = visible.iter().map(|lead| lead.id.as_str()).collect();
    selection.retain(|id| visible_ids.contains(id.as_str()));
}

/// Resolve a seleção pedida em leads concretos, na ordem visível.
/// `select_all` ignora a lista de ids e pega o conjunto visível inteiro.
pub fn resolve(visible: Vec<Lead>, ids: &[String], select_all_flag: bool) -> Vec<Lead> {
    if select_all_flag {
        return visible;
    }
    let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
    visible
        .into_iter()
        .filter(|lead| wanted.contains(lead.id.as_str()))
        .collect()
}

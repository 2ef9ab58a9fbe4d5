// src/services/lead_page.rs

use serde::Serialize;
use utoipa::ToSchema;

// ---
// MOTOR DE PAGINAÇÃO
// Fatia a coleção já filtrada e ordenada. A página é 1-indexada e entra
// validada (>= 1); aqui ela ainda é grampeada à última página para o
// usuário não ficar preso numa página vazia quando o filtro encolhe o
// conjunto.
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_count: usize,
    pub total_pages: u32,
}

pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let per_page = per_page.max(1);
    let total_count = items.len();
    let total_pages = (total_count as u32).div_ceil(per_page);

    let effective_page = page.clamp(1, total_pages.max(1));
    let start = ((effective_page - 1) * per_page) as usize;

    let items = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Page {
        items,
        page: effective_page,
        per_page,
        total_count,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenated_pages_reproduce_the_collection() {
        let items: Vec<u32> = (0..107).collect();
        let per_page = 20;
        let total_pages = paginate(items.clone(), 1, per_page).total_pages;
        assert_eq!(total_pages, 6);

        let mut rebuilt = Vec::new();
        for page in 1..=total_pages {
            rebuilt.extend(paginate(items.clone(), page, per_page).items);
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(paginate((0..100).collect::<Vec<_>>(), 1, 50).total_pages, 2);
        assert_eq!(paginate((0..101).collect::<Vec<_>>(), 1, 50).total_pages, 3);
        assert_eq!(paginate(Vec::<u32>::new(), 1, 50).total_pages, 0);
    }

    #[test]
    fn out_of_range_page_is_clamped_to_the_last_one() {
        let page = paginate((0..45).collect::<Vec<_>>(), 9, 20);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, (40..45).collect::<Vec<_>>());
    }

    #[test]
    fn empty_collection_yields_an_empty_first_page() {
        let page = paginate(Vec::<u32>::new(), 1, 20);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }
}

use common::product::enums::Sort;
use mongodb::bson::{Document, doc};

use super::{effective_price_stage::EFFECTIVE_PRICE_FIELD, traits::StageDocument};

pub(super) struct SortStage {
    sort: Sort,
}

/// Comparator tuple for each sort key, `1` ascending and `-1` descending.
pub(crate) fn sort_fields(sort: Sort) -> &'static [(&'static str, i32)] {
    match sort {
        Sort::Newest => &[("createdAt", -1)],
        Sort::Oldest => &[("createdAt", 1)],
        Sort::PriceLow => &[(EFFECTIVE_PRICE_FIELD, 1)],
        Sort::PriceHigh => &[(EFFECTIVE_PRICE_FIELD, -1)],
        Sort::Rating => &[("averageRating", -1), ("totalReviews", -1)],
        Sort::Popular => &[("totalReviews", -1), ("averageRating", -1)],
        Sort::NameAsc => &[("name", 1)],
        Sort::NameDesc => &[("name", -1)],
    }
}

impl SortStage {
    pub(super) fn new(sort: Sort) -> Self {
        Self { sort }
    }
}

impl StageDocument for SortStage {
    fn get_stage_documents(&self) -> Vec<Document> {
        let mut order = Document::new();

        for (field, direction) in sort_fields(self.sort) {
            order.insert(*field, *direction);
        }

        // stable paging across equal keys
        order.insert("_id", 1);

        vec![doc! { "$sort": order }]
    }
}

use mongodb::bson::{Document, doc};

use super::traits::StageDocument;

pub(super) struct PageStage {
    skip: u64,
    limit: u32,
}

impl PageStage {
    pub(super) fn new(skip: u64, limit: u32) -> Self {
        Self { skip, limit }
    }
}

impl StageDocument for PageStage {
    fn get_stage_documents(&self) -> Vec<Document> {
        vec![
            doc! {
                "$skip": self.skip as i64
            },
            doc! {
                "$limit": i64::from(self.limit)
            },
        ]
    }
}

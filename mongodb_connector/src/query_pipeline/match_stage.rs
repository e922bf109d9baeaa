use mongodb::bson::{Document, doc};

use super::{predicate::Predicate, traits::StageDocument};

pub(super) struct MatchStage<'a> {
    predicates: Vec<&'a Predicate>,
}

impl<'a> MatchStage<'a> {
    pub(super) fn new(predicates: Vec<&'a Predicate>) -> Self {
        Self { predicates }
    }
}

impl StageDocument for MatchStage<'_> {
    fn get_stage_documents(&self) -> Vec<Document> {
        let mut filters: Vec<Document> = self
            .predicates
            .iter()
            .map(|predicate| predicate.to_document())
            .collect();

        // several predicates carry their own top level "$or"
        match filters.len() {
            0 => vec![],
            1 => vec![doc! { "$match": filters.remove(0) }],
            _ => vec![doc! { "$match": { "$and": filters } }],
        }
    }
}

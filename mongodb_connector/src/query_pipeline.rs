mod effective_price_stage;
mod facet_stage;
mod lookup_stage;
mod match_stage;
#[cfg(test)]
mod memory;
mod page_stage;
pub mod plan;
pub mod predicate;
mod sort_stage;
pub mod traits;

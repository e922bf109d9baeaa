use std::collections::HashMap;

use async_trait::async_trait;
use common::{reference::ReferenceKind, search_params::ProductQuery};
use mongodb::bson::{Document, doc, oid::ObjectId};
use tracing::{debug, warn};

use crate::{errors::ConnectorError, query_pipeline::plan::ResolvedReferences};

/// Anything able to turn name/slug tokens into reference ids.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn find_ids(
        &self,
        kind: ReferenceKind,
        tokens: &[String],
    ) -> Result<Vec<ObjectId>, ConnectorError>;
}

/// `{$or: [{name: /^token$/i}, ..., {slug: {$in: [lowercased tokens]}}]}`
pub(crate) fn token_filter(tokens: &[String]) -> Document {
    let mut alternatives: Vec<Document> = tokens
        .iter()
        .map(|token| {
            doc! {
                "name": {
                    "$regex": format!("^{}$", regex::escape(token)),
                    "$options": "i",
                }
            }
        })
        .collect();

    let slugs: Vec<String> = tokens.iter().map(|token| token.to_lowercase()).collect();

    alternatives.push(doc! { "slug": { "$in": slugs } });

    doc! { "$or": alternatives }
}

/// Resolves filter tokens for a single request. Lookups are memoized for the
/// lifetime of the resolver, so build one per request.
///
/// Tokens that match nothing, and lookups that fail, resolve to an empty id
/// list: an unknown brand must filter everything out, not nothing.
pub struct ReferenceResolver<'a, L: ReferenceLookup + ?Sized> {
    lookup: &'a L,
    cache: HashMap<(ReferenceKind, Vec<String>), Vec<ObjectId>>,
}

impl<'a, L: ReferenceLookup + ?Sized> ReferenceResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            cache: HashMap::new(),
        }
    }

    /// `None` when no tokens were given (no filter), otherwise the matched ids.
    pub async fn resolve(
        &mut self,
        kind: ReferenceKind,
        tokens: &[String],
    ) -> Option<Vec<ObjectId>> {
        if tokens.is_empty() {
            return None;
        }

        let key = (kind, tokens.to_vec());

        if let Some(ids) = self.cache.get(&key) {
            return Some(ids.clone());
        }

        let ids = match self.lookup.find_ids(kind, tokens).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!("Failed to resolve {kind} tokens {tokens:?}, filtering everything out: {err}");
                Vec::new()
            }
        };

        if ids.is_empty() {
            warn!("No {kind} matched {tokens:?}");
        } else {
            debug!("Resolved {kind} {tokens:?} into {} ids", ids.len());
        }

        self.cache.insert(key, ids.clone());

        Some(ids)
    }

    pub async fn resolve_query(&mut self, query: &ProductQuery) -> ResolvedReferences {
        ResolvedReferences {
            brands: self.resolve(ReferenceKind::Brand, &query.brands).await,
            categories: self.resolve(ReferenceKind::Category, &query.categories).await,
            age_ranges: self.resolve(ReferenceKind::AgeRange, &query.age_ranges).await,
        }
    }
}

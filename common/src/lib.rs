pub mod deserialize_disallow_empty_string;
pub mod errors;
pub mod object_id;
pub mod product;
pub mod reference;
pub mod response;
pub mod search_params;
pub mod utils;

pub(crate) mod products;
pub(crate) mod references;

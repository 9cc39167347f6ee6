//! Query client implementations

pub mod graphql;

pub use graphql::GraphQlClient;

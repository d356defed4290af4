//! Serializers for reconciliation output.

pub mod nquads;

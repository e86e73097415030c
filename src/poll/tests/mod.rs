//! Unit tests for the poll domain, in-memory adapter and services.

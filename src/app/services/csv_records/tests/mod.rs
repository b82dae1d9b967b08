//! Tests for the delimited-text parser

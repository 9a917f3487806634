//! # FAQ Desk
//!
//! A conversational FAQ assistant: it ingests a public FAQ page at
//! startup, indexes it for semantic retrieval, and answers questions
//! over an HTTP chat API. Questions with no sufficiently similar
//! indexed content get a fixed, configured fallback reply; in-scope
//! answers come with ranked follow-up question suggestions mined from
//! the best-matching chunk.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────────┐   ┌───────────────┐
//! │  Fetch  │──▶│ Chunk + Embed │──▶│ EmbeddingIndex │
//! └─────────┘   └──────────────┘   └──────┬────────┘
//!                 (once, at startup)       │
//!                                          ▼
//!                    ┌────────────┐   ┌─────────┐   ┌──────────┐
//!   POST /api/ask ──▶│ Scope gate │──▶│ Answer  │ + │ Suggest  │
//!                    └────────────┘   └─────────┘   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Ingestion/generation error taxonomy |
//! | [`fetch`] | Page fetching and HTML-to-text extraction |
//! | [`chunk`] | Overlapping text chunking |
//! | [`provider`] | Shared OpenAI-compatible HTTP client |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | In-memory similarity index |
//! | [`scope`] | In-scope / out-of-scope gate |
//! | [`suggest`] | TF-IDF follow-up question ranking |
//! | [`generate`] | Context-bound answer generation |
//! | [`history`] | Append-only conversation log |
//! | [`word_suggest`] | Static-vocabulary lexical suggestions |
//! | [`ingest`] | Startup pipeline orchestration |
//! | [`server`] | HTTP JSON API |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod history;
pub mod index;
pub mod ingest;
pub mod models;
pub mod provider;
pub mod scope;
pub mod server;
pub mod suggest;
pub mod word_suggest;

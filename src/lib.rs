//! MindMate: a supportive chat companion core.
//!
//! The crate classifies the emotional tone of a user's message and picks a
//! canned reply, escalating to crisis-resource messaging whenever self-harm
//! indicators appear:
//!
//! Text → crisis screen → sentiment classifier → verdict → responder → reply
//!
//! # Architecture
//!
//! - **Classifier** ([`classifier`]): a synchronous crisis screen in front of a
//!   pluggable sentiment classifier (keyword rules, or a learned model that
//!   falls back to them)
//! - **Responder** ([`responder`]): uniform random pick from a validated,
//!   label-indexed response table
//! - **Service** ([`service`]): both of the above behind one stateless handle
//! - **Server** ([`server`]): the `{action, data}` HTTP surface used by chat
//!   front ends, with an in-memory interaction log and 7-day analytics
//!
//! ```
//! let verdict = mindmate::classify("I am sad and tired and anxious").unwrap();
//! assert_eq!(verdict.label, mindmate::Label::Negative);
//! let reply = mindmate::Responder::default().respond(&verdict);
//! assert!(!reply.is_empty());
//! ```

pub mod analytics;
pub mod classifier;
pub mod config;
pub mod error;
pub mod interaction;
pub mod lexicon;
pub mod logging;
pub mod mood;
pub mod responder;
pub mod server;
pub mod service;
pub mod verdict;

pub use classifier::{SafetyClassifier, SentimentClassifier, classify};
pub use config::MindMateConfig;
pub use error::{MindMateError, Result};
pub use mood::{MoodBucket, MoodLabel};
pub use responder::{Responder, ResponseTable};
pub use service::{CompanionService, Turn};
pub use verdict::{Label, Verdict};

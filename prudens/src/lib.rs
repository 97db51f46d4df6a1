/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod config;
pub mod custom_error;
pub mod error;
pub mod parser_prudens;
pub mod reasoning;

pub use config::{OperationMode, ReasonerConfig};
pub use error::PrudensError;
pub use reasoning::{InferenceResult, Reasoner};

/// Parses both texts, loads the rules and runs inference to a fixpoint.
pub fn run(
    knowledge_base: &str,
    context: &str,
    config: ReasonerConfig,
) -> Result<InferenceResult, PrudensError> {
    let parsed = parser_prudens::parse_knowledge_base(knowledge_base)?;
    let context = parser_prudens::parse_context(context)?;
    let reasoner = Reasoner::from_knowledge_base(parsed.knowledge_base())?.with_config(config);
    Ok(reasoner.infer(&context)?)
}

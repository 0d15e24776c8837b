//! Prover-side secrets.
//!
//! A [`TokenDataWitness`] is the opening of one token. A
//! [`WellFormednessWitness`] groups the input and output openings of a
//! transfer. Neither ever leaves the prover, and `Debug` redacts the
//! scalars so they do not end up in logs by accident.

use ark_bn254::Fr;
use rand::{CryptoRng, Rng};
use std::fmt;

use super::commitment::{commit, type_scalar, Token};
use super::params::PublicParams;
use crate::crypto::algebra::{random_scalar, scalar_from_u64};
use crate::error::{Result, ZkatError};

/// Opening of a single token: `(type, value, blinding factor)`.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenDataWitness {
    pub token_type: String,
    pub value: Fr,
    pub blinding_factor: Fr,
}

impl TokenDataWitness {
    pub fn new(token_type: impl Into<String>, value: Fr, blinding_factor: Fr) -> Self {
        Self {
            token_type: token_type.into(),
            value,
            blinding_factor,
        }
    }

    /// Witness for `value` with a fresh random blinding factor.
    pub fn random<R: Rng + CryptoRng + ?Sized>(
        token_type: impl Into<String>,
        value: u64,
        rng: &mut R,
    ) -> Self {
        Self::new(token_type, scalar_from_u64(value), random_scalar(rng))
    }

    /// The public token this witness opens.
    pub fn to_token(&self, params: &PublicParams) -> Token {
        commit(params, &self.value, &self.blinding_factor, &self.token_type)
    }

    /// The type as committed on `T`.
    pub fn type_scalar(&self) -> Fr {
        type_scalar(&self.token_type)
    }
}

impl fmt::Debug for TokenDataWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDataWitness")
            .field("token_type", &self.token_type)
            .field("value", &"<redacted>")
            .field("blinding_factor", &"<redacted>")
            .finish()
    }
}

/// Build issue witnesses for one type from parallel value/blinding lists.
///
/// # Errors
///
/// [`ZkatError::MalformedInput`] if the lists differ in length.
pub fn new_token_data_witnesses(
    token_type: &str,
    values: &[Fr],
    blinding_factors: &[Fr],
) -> Result<Vec<TokenDataWitness>> {
    if values.len() != blinding_factors.len() {
        return Err(ZkatError::MalformedInput(format!(
            "{} values but {} blinding factors",
            values.len(),
            blinding_factors.len()
        )));
    }
    Ok(values
        .iter()
        .zip(blinding_factors)
        .map(|(v, bf)| TokenDataWitness::new(token_type, *v, *bf))
        .collect())
}

/// Input and output openings of a transfer, paired positionally with the
/// public input and output tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellFormednessWitness {
    inputs: Vec<TokenDataWitness>,
    outputs: Vec<TokenDataWitness>,
}

impl WellFormednessWitness {
    pub fn new(inputs: Vec<TokenDataWitness>, outputs: Vec<TokenDataWitness>) -> Self {
        Self { inputs, outputs }
    }

    pub fn inputs(&self) -> &[TokenDataWitness] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TokenDataWitness] {
        &self.outputs
    }

    pub fn in_values(&self) -> Vec<Fr> {
        self.inputs.iter().map(|w| w.value).collect()
    }

    pub fn out_values(&self) -> Vec<Fr> {
        self.outputs.iter().map(|w| w.value).collect()
    }

    pub fn in_blinding_factors(&self) -> Vec<Fr> {
        self.inputs.iter().map(|w| w.blinding_factor).collect()
    }

    pub fn out_blinding_factors(&self) -> Vec<Fr> {
        self.outputs.iter().map(|w| w.blinding_factor).collect()
    }

    /// The shared token type, or `None` if empty or mixed.
    pub fn token_type(&self) -> Option<&str> {
        common_type(self.inputs.iter().chain(&self.outputs))
    }

    /// Input and output tokens as `(inputs, outputs)`.
    pub fn tokens(&self, params: &PublicParams) -> (Vec<Token>, Vec<Token>) {
        (
            self.inputs.iter().map(|w| w.to_token(params)).collect(),
            self.outputs.iter().map(|w| w.to_token(params)).collect(),
        )
    }

    pub fn into_parts(self) -> (Vec<TokenDataWitness>, Vec<TokenDataWitness>) {
        (self.inputs, self.outputs)
    }
}

/// The one type every witness carries, or `None` if there are none or
/// they disagree.
pub(crate) fn common_type<'a, I>(witnesses: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a TokenDataWitness>,
{
    let mut iter = witnesses.into_iter();
    let first = iter.next()?.token_type.as_str();
    iter.all(|w| w.token_type == first).then_some(first)
}

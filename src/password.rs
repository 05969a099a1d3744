// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use log::trace;
use rand::distr::Alphanumeric;
use rand::Rng;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NUMERIC: &[u8] = b"0123456789";
const SPECIAL_CHARS: &[u8] = br"~!@#$%^&*()_+-=:';,./<>?{}[]\|";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PasswordPolicy {
    pub(crate) min_length: usize,
    pub(crate) num_uppercase: usize,
    pub(crate) num_lowercase: usize,
    pub(crate) num_numeric: usize,
    pub(crate) num_specialchars: usize,
}

/// Generates a password satisfying `policy`.
///
/// Characters are emitted in contiguous blocks: uppercase, lowercase, numeric, special, followed
/// by alphanumeric padding up to `min_length`. The blocks are not shuffled.
pub(crate) fn generate_policy_password(policy: &PasswordPolicy) -> String {
    trace!("Generating password for policy {:?}", policy);

    let mut rng = rand::rng();
    let mut password = String::with_capacity(policy.min_length);

    for (charset, count) in [
        (UPPERCASE, policy.num_uppercase),
        (LOWERCASE, policy.num_lowercase),
        (NUMERIC, policy.num_numeric),
        (SPECIAL_CHARS, policy.num_specialchars),
    ] {
        password.extend((0..count).map(|_| charset[rng.random_range(0..charset.len())] as char));
    }

    let padding = policy.min_length.saturating_sub(password.len());
    password.extend((0..padding).map(|_| rng.sample(Alphanumeric) as char));

    password
}

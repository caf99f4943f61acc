// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `error` field when it sent one.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response format")]
    InvalidResponse,
    #[error("Response is missing '{0}'")]
    MissingField(&'static str),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend could not be reached at all, as opposed to
    /// answering with a rejection.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::InvalidResponse => true,
            ApiError::Http { status, .. } => *status >= 500,
            ApiError::MissingField(_) => false,
        }
    }
}

/// Form-level problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,
    #[error("category is required")]
    MissingCategory,
    #[error("transaction id is required for update")]
    MissingId,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

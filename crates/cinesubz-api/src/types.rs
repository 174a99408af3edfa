//! JSON envelope types of the external contract

use serde::Serialize;

use cinesubz_core::{MovieDetails, ResolvedDownload, SearchResult};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub success: bool,
    pub data: MovieDetails,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub download_options: Vec<ResolvedDownload>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }
}

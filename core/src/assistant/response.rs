//! Extract text and citations from provider responses.
//!
//! Everything here degrades instead of failing: missing text becomes an
//! empty string and a missing grounding path becomes an empty source list.

use serde::{Deserialize, Serialize};

use super::wire::{
    Candidate, GenerateContentResponse, GroundingChunk, PlaceAnswerSources,
    PlaceAnswerSourcesField,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSnippet {
    pub uri: String,
    pub text: String,
}

/// A citation returned alongside a grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceChunk {
    Web {
        uri: String,
        title: String,
    },
    Maps {
        uri: String,
        title: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        review_snippets: Vec<ReviewSnippet>,
    },
}

impl SourceChunk {
    pub fn uri(&self) -> &str {
        match self {
            Self::Web { uri, .. } | Self::Maps { uri, .. } => uri,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Web { title, .. } | Self::Maps { title, .. } => title,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingResult {
    pub text: String,
    pub sources: Vec<SourceChunk>,
}

fn first_candidate(response: &GenerateContentResponse) -> Option<&Candidate> {
    response.candidates.as_ref()?.first()
}

/// Joined text parts of the first candidate, skipping thought summaries.
pub fn response_text(response: &GenerateContentResponse) -> String {
    let Some(content) = first_candidate(response).and_then(|c| c.content.as_ref()) else {
        return String::new();
    };
    content
        .parts
        .iter()
        .filter(|part| !part.thought.unwrap_or(false))
        .filter_map(|part| part.text.as_deref())
        .collect::<Vec<_>>()
        .concat()
}

pub fn grounding_sources(response: &GenerateContentResponse) -> Vec<SourceChunk> {
    first_candidate(response)
        .and_then(|c| c.grounding_metadata.as_ref())
        .and_then(|meta| meta.grounding_chunks.as_ref())
        .map(|chunks| chunks.iter().filter_map(to_source).collect())
        .unwrap_or_default()
}

pub fn normalize_grounded(response: &GenerateContentResponse) -> GroundingResult {
    GroundingResult {
        text: response_text(response),
        sources: grounding_sources(response),
    }
}

fn to_source(chunk: &GroundingChunk) -> Option<SourceChunk> {
    if let Some(web) = &chunk.web {
        return Some(SourceChunk::Web {
            uri: web.uri.clone().unwrap_or_default(),
            title: web.title.clone().unwrap_or_default(),
        });
    }
    let maps = chunk.maps.as_ref()?;
    let review_snippets = match &maps.place_answer_sources {
        Some(PlaceAnswerSourcesField::Many(list)) => list.iter().flat_map(snippets).collect(),
        Some(PlaceAnswerSourcesField::One(single)) => snippets(single).collect(),
        Some(PlaceAnswerSourcesField::Other(_)) | None => Vec::new(),
    };
    Some(SourceChunk::Maps {
        uri: maps.uri.clone().unwrap_or_default(),
        title: maps.title.clone().unwrap_or_default(),
        review_snippets,
    })
}

fn snippets(sources: &PlaceAnswerSources) -> impl Iterator<Item = ReviewSnippet> + '_ {
    sources.review_snippets.iter().map(|raw| ReviewSnippet {
        uri: raw.uri.clone().unwrap_or_default(),
        text: raw.text.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_candidates_yield_empty_result() {
        let result = normalize_grounded(&decode(json!({})));
        assert_eq!(result, GroundingResult::default());
    }

    #[test]
    fn text_without_grounding_metadata_has_no_sources() {
        let result = normalize_grounded(&decode(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Ada Lovelace" }] } }]
        })));
        assert_eq!(result.text, "Ada Lovelace");
        assert!(result.sources.is_empty());
    }

    #[test]
    fn text_parts_are_joined_and_thoughts_skipped() {
        let response = decode(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "planning...", "thought": true },
                { "text": "Hello, " },
                { "text": "class." }
            ] } }]
        }));
        assert_eq!(response_text(&response), "Hello, class.");
    }

    #[test]
    fn web_and_maps_chunks_are_extracted_in_order() {
        let response = decode(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Two libraries nearby." }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://example.edu/a", "title": "Library hours" } },
                    {},
                    { "maps": {
                        "uri": "https://maps.example/b",
                        "title": "Bodleian",
                        "placeAnswerSources": { "reviewSnippets": [
                            { "uri": "https://maps.example/r1", "text": "Quiet reading room" }
                        ] }
                    } },
                    { "maps": { "title": "Radcliffe Camera" } }
                ] }
            }]
        }));
        let result = normalize_grounded(&response);
        assert_eq!(result.text, "Two libraries nearby.");
        assert_eq!(
            result.sources,
            vec![
                SourceChunk::Web {
                    uri: "https://example.edu/a".into(),
                    title: "Library hours".into(),
                },
                SourceChunk::Maps {
                    uri: "https://maps.example/b".into(),
                    title: "Bodleian".into(),
                    review_snippets: vec![ReviewSnippet {
                        uri: "https://maps.example/r1".into(),
                        text: "Quiet reading room".into(),
                    }],
                },
                SourceChunk::Maps {
                    uri: String::new(),
                    title: "Radcliffe Camera".into(),
                    review_snippets: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn partial_metadata_path_is_tolerated() {
        let response = decode(json!({
            "candidates": [{ "groundingMetadata": { "webSearchQueries": ["q"] } }]
        }));
        let result = normalize_grounded(&response);
        assert_eq!(result.text, "");
        assert!(result.sources.is_empty());
    }

    #[test]
    fn source_chunks_serialise_with_kind_tag() {
        let chunk = SourceChunk::Web {
            uri: "u".into(),
            title: "t".into(),
        };
        assert_eq!(
            serde_json::to_value(&chunk).unwrap(),
            json!({ "kind": "web", "uri": "u", "title": "t" })
        );
        assert_eq!(chunk.uri(), "u");
        assert_eq!(chunk.title(), "t");
    }
}

// src/services/site.rs

//! Site variants for the two question-bank hosts.
//!
//! leetcode.com and leetcode.cn expose the same pair of endpoints (a JSON
//! problem listing and a GraphQL detail endpoint) but differ in host and in
//! which fields the detail schema carries; the cn host additionally serves
//! translated titles and content. Everything host-specific lives behind
//! [`Site`], selected once at startup.

use clap::ValueEnum;
use serde_json::{Value, json};

const EN_URL: &str = "https://leetcode.com";
const CN_URL: &str = "https://leetcode.cn";

/// Question fields served by both hosts.
const COMMON_FIELDS: &str = "\
            questionId
            questionFrontendId
            boundTopicId
            title
            titleSlug
            content
            isPaidOnly
            difficulty
            likes
            dislikes
            similarQuestions
            contributors {
                username
                profileUrl
                avatarUrl
            }
            langToValidPlayground
            companyTagStats
            codeSnippets {
                lang
                langSlug
                code
            }
            stats
            hints
            status
            sampleTestCase
            metaData
            judgerAvailable
            judgeType
            mysqlSchemas
            enableRunCode
            enableTestMode
            envInfo
            libraryUrl
            note";

/// Host-specific request construction.
pub trait Site: Send + Sync {
    fn kind(&self) -> SiteKind;

    /// Full-catalog listing endpoint.
    fn index_url(&self) -> String;

    /// GraphQL endpoint for per-problem detail.
    fn graphql_url(&self) -> String;

    /// JSON body of the detail request for the given slug.
    fn detail_body(&self, slug: &str) -> Value;
}

/// Site selector, exposed on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SiteKind {
    /// leetcode.com
    Com,
    /// leetcode.cn
    Cn,
}

impl SiteKind {
    /// Instantiate the matching site implementation.
    pub fn site(self) -> Box<dyn Site> {
        match self {
            SiteKind::Com => Box::new(LeetCodeCom),
            SiteKind::Cn => Box::new(LeetCodeCn),
        }
    }

    pub fn host(self) -> &'static str {
        match self {
            SiteKind::Com => EN_URL,
            SiteKind::Cn => CN_URL,
        }
    }
}

fn question_query(extra_fields: &str) -> String {
    format!(
        "query questionData($titleSlug: String!) {{\n\
         question(titleSlug: $titleSlug) {{\n{COMMON_FIELDS}{extra_fields}\n}}\n}}"
    )
}

fn detail_body(query: String, slug: &str) -> Value {
    json!({
        "operationName": "questionData",
        "query": query,
        "variables": { "titleSlug": slug },
    })
}

/// The international host.
pub struct LeetCodeCom;

impl Site for LeetCodeCom {
    fn kind(&self) -> SiteKind {
        SiteKind::Com
    }

    fn index_url(&self) -> String {
        format!("{EN_URL}/api/problems/all/")
    }

    fn graphql_url(&self) -> String {
        format!("{EN_URL}/graphql")
    }

    fn detail_body(&self, slug: &str) -> Value {
        detail_body(question_query(""), slug)
    }
}

/// The Chinese host; detail schema additionally carries translations.
pub struct LeetCodeCn;

impl Site for LeetCodeCn {
    fn kind(&self) -> SiteKind {
        SiteKind::Cn
    }

    fn index_url(&self) -> String {
        format!("{CN_URL}/api/problems/all/")
    }

    fn graphql_url(&self) -> String {
        format!("{CN_URL}/graphql")
    }

    fn detail_body(&self, slug: &str) -> Value {
        let extra = "\n            translatedTitle\n            translatedContent\n            \
                     topicTags {\n                name\n                slug\n                \
                     translatedName\n            }";
        detail_body(question_query(extra), slug)
    }
}

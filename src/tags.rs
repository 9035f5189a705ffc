//! Keyword-based tag extraction for articles without server-supplied tags.
//!
//! The backend normally attaches tags during ingestion; this is the client
//! fallback for articles that arrive with none. It is a deterministic
//! heuristic, not NLP: a fixed category table matched against the text, then
//! the highest-frequency content words. Server-provided tags always win —
//! see [`display_tags`].

use crate::api::Article;

/// Upper bound on tags attached to a single article.
pub const MAX_TAGS: usize = 5;

/// Tokens this short are noise for the frequency pass. Category labels are
/// exempt (they come from the table, not from tokenization).
const MIN_TOKEN_LEN: usize = 4;

/// A technical category and the lowercase keywords that signal it.
struct Category {
    label: &'static str,
    keywords: &'static [&'static str],
}

/// Category table, checked in order. Multi-word keywords are matched as
/// substrings of the lowercased text, single words against whole tokens.
const CATEGORIES: &[Category] = &[
    Category {
        label: "Cloud",
        keywords: &[
            "aws",
            "azure",
            "gcp",
            "cloud",
            "lambda",
            "s3",
            "ec2",
            "serverless",
            "kubernetes",
            "k8s",
            "saas",
            "amazon web services",
            "google cloud",
        ],
    },
    Category {
        label: "IA",
        keywords: &[
            "ai",
            "ia",
            "llm",
            "gpt",
            "chatbot",
            "machine learning",
            "deep learning",
            "neural network",
            "artificial intelligence",
            "intelligence artificielle",
        ],
    },
    Category {
        label: "Security",
        keywords: &[
            "security",
            "cybersecurity",
            "vulnerability",
            "cve",
            "exploit",
            "ransomware",
            "phishing",
            "malware",
            "encryption",
            "zero trust",
            "zero-day",
            "securite",
        ],
    },
    Category {
        label: "Dev",
        keywords: &[
            "api",
            "sdk",
            "rust",
            "python",
            "java",
            "golang",
            "compiler",
            "framework",
            "refactoring",
            "open source",
            "developpement",
        ],
    },
    Category {
        label: "DevOps",
        keywords: &[
            "devops",
            "docker",
            "terraform",
            "ansible",
            "gitops",
            "pipeline",
            "observability",
            "ci/cd",
            "continuous integration",
            "continuous deployment",
        ],
    },
    Category {
        label: "Database",
        keywords: &[
            "database",
            "sql",
            "postgresql",
            "postgres",
            "mysql",
            "sqlite",
            "redis",
            "mongodb",
            "data warehouse",
            "data lake",
        ],
    },
    Category {
        label: "Web",
        keywords: &[
            "web",
            "http",
            "browser",
            "html",
            "css",
            "javascript",
            "typescript",
            "react",
            "vue",
            "angular",
            "frontend",
            "wasm",
        ],
    },
    Category {
        label: "Mobile",
        keywords: &[
            "mobile",
            "android",
            "ios",
            "iphone",
            "smartphone",
            "flutter",
            "kotlin",
            "swift",
        ],
    },
];

/// Words carrying no topical signal, English and French. Only words of
/// `MIN_TOKEN_LEN` or more matter here; shorter ones are dropped anyway.
const STOPWORDS: &[&str] = &[
    // English
    "about", "after", "again", "also", "been", "before", "being", "between",
    "both", "could", "does", "down", "each", "from", "have", "here", "into",
    "just", "like", "more", "most", "only", "other", "over", "same", "should",
    "some", "such", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "under", "very", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
    // French
    "ainsi", "apres", "aussi", "avec", "cette", "cela", "chez", "comme",
    "dans", "depuis", "donc", "elle", "elles", "encore", "entre", "etre",
    "fait", "ils", "leur", "leurs", "mais", "meme", "nous", "notre", "plus",
    "pour", "quand", "sans", "selon", "sont", "sous", "tous", "tout", "toute",
    "toutes", "vers", "vous",
];

/// Extract up to [`MAX_TAGS`] topical labels from an article's title and
/// description.
///
/// Deterministic given its inputs: category labels in table order, then the
/// highest-frequency content words (ties broken by first appearance), each
/// capitalized, deduplicated case-insensitively.
pub fn extract_tags(title: &str, description: &str) -> Vec<String> {
    let text = format!("{} {}", title, description).to_lowercase();
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);

    for category in CATEGORIES {
        if category_matches(category, &text, &tokens) {
            tags.push(category.label.to_string());
        }
    }

    for token in top_tokens(&tokens) {
        tags.push(capitalize(token));
    }

    dedup_case_insensitive(&mut tags);
    tags.truncate(MAX_TAGS);
    tags
}

/// Display tags for a card: server-supplied tags verbatim when present,
/// extracted fallback otherwise. The extractor never overrides the server.
pub fn display_tags(article: &Article) -> Vec<String> {
    if !article.tags.is_empty() {
        return article.tags.iter().map(|t| t.name.clone()).collect();
    }
    extract_tags(&article.title, &article.description)
}

fn category_matches(category: &Category, text: &str, tokens: &[&str]) -> bool {
    category.keywords.iter().any(|keyword| {
        if keyword.contains(' ') || keyword.contains('/') || keyword.contains('-') {
            text.contains(keyword)
        } else {
            tokens.contains(keyword)
        }
    })
}

/// The five most frequent content tokens, first-seen order breaking ties.
fn top_tokens<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for &token in tokens {
        if token.chars().count() < MIN_TOKEN_LEN || STOPWORDS.contains(&token) {
            continue;
        }
        match counts.iter_mut().find(|(t, _)| *t == token) {
            Some((_, count)) => *count += 1,
            None => counts.push((token, 1)),
        }
    }
    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(MAX_TAGS).map(|(t, _)| t).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn dedup_case_insensitive(tags: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    tags.retain(|tag| {
        let key = tag.to_lowercase();
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let title = "Kubernetes networking deep dive";
        let desc = "A long look at kubernetes networking, services and ingress routing";
        let first = extract_tags(title, desc);
        let second = extract_tags(title, desc);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cloud_example() {
        let tags = extract_tags(
            "AWS Lambda pricing update",
            "Amazon announces new pricing for AWS Lambda functions",
        );
        assert!(tags.contains(&"Cloud".to_string()), "tags: {:?}", tags);
        assert!(tags.len() <= MAX_TAGS);
    }

    #[test]
    fn test_output_bounded() {
        let desc = "rust tokio async await channel executor runtime spawn select stream \
                    future waker context polling reactor driver scheduler task";
        let tags = extract_tags("Writing async rust services", desc);
        assert!(tags.len() <= MAX_TAGS);
    }

    #[test]
    fn test_no_stopwords_or_short_tokens() {
        let tags = extract_tags(
            "What they said about the new API",
            "This is more about what would have been said with it",
        );
        for tag in &tags {
            let lower = tag.to_lowercase();
            assert!(!STOPWORDS.contains(&lower.as_str()), "stopword leaked: {}", tag);
            // Short tokens only allowed when they are category labels.
            if tag.chars().count() < MIN_TOKEN_LEN {
                assert!(
                    CATEGORIES.iter().any(|c| c.label == tag),
                    "short non-category token: {}",
                    tag
                );
            }
        }
    }

    #[test]
    fn test_frequency_ranking_with_first_seen_ties() {
        // "postgres" appears twice, everything else once; ties keep the
        // order of first appearance.
        let tags = extract_tags(
            "postgres replication",
            "postgres streaming replication explained simply",
        );
        // Category "Database" first (postgres keyword), then frequency tokens.
        assert_eq!(tags[0], "Database");
        assert_eq!(tags[1], "Postgres");
        assert_eq!(tags[2], "Replication");
    }

    #[test]
    fn test_category_label_comes_first() {
        let tags = extract_tags("Docker build cache", "Speed up docker builds with cache mounts");
        assert_eq!(tags[0], "DevOps");
        // "docker" may also surface as a frequency token, but never twice.
        assert!(tags.iter().filter(|t| t.to_lowercase() == "docker").count() <= 1);
    }

    #[test]
    fn test_dedup_is_case_insensitive() {
        // "Cloud" the category label and "cloud" the frequency token collapse.
        let tags = extract_tags(
            "Moving to the cloud",
            "Cloud migration costs and cloud billing surprises",
        );
        assert_eq!(tags[0], "Cloud");
        assert_eq!(
            tags.iter().filter(|t| t.to_lowercase() == "cloud").count(),
            1
        );
    }

    #[test]
    fn test_multiword_keyword_matches() {
        let tags = extract_tags(
            "Understanding machine learning systems",
            "Production concerns beyond the model",
        );
        assert!(tags.contains(&"IA".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_tags("", "").is_empty());
    }

    #[test]
    fn test_display_tags_prefers_server_tags() {
        use crate::api::{Article, Tag};
        use chrono::Utc;

        let mut article = Article {
            id: "a1".into(),
            title: "AWS Lambda pricing update".into(),
            description: "Amazon announces new pricing".into(),
            link: "https://example.com/a1".into(),
            image_url: None,
            source: "AWS".into(),
            pub_date: Utc::now(),
            read: false,
            read_later: false,
            tags: vec![Tag {
                name: "Serverless".into(),
                confidence: 1.0,
            }],
        };
        assert_eq!(display_tags(&article), vec!["Serverless".to_string()]);

        article.tags.clear();
        assert!(display_tags(&article).contains(&"Cloud".to_string()));
    }
}

use super::legend::Category;
use super::semantic_tokens::HighlightSpan;

pub(crate) const SAMPLE: &str = "# Layerfile for the web app
FROM vm/ubuntu:18.04
MEMORY 2G
ENV NODE_ENV=production
ENV GREETING hello world
COPY . /app
WORKDIR /app
CACHE /root/.npm # cache npm
RUN npm ci
SKIP REMAINING IF BRANCH!=main AND CI=~true
SPLIT 3
EXPOSE WEBSITE http://localhost:8080
USER builder
";

pub(crate) fn sample_source() -> &'static str {
    SAMPLE
}

/// Source text under each span of `category`. Only valid for ASCII sources.
pub(crate) fn snippets(spans: &[HighlightSpan], category: Category, source: &str) -> Vec<String> {
    let lines: Vec<&str> = source.lines().collect();
    spans
        .iter()
        .filter(|span| span.category == category)
        .map(|span| {
            let start = span.start_character as usize;
            let end = start + span.length as usize;
            lines[span.line as usize][start..end].to_string()
        })
        .collect()
}

//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::features::legend::Legend;
use crate::features::semantic_tokens::{collect_semantic_spans, HighlightSpan};
use layerfile_config::{LayerfileConfig, ValueSpanMode};
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    InitializeParams, InitializeResult, InitializedParams, SemanticToken, SemanticTokens,
    SemanticTokensFullOptions, SemanticTokensOptions, SemanticTokensParams, SemanticTokensResult,
    SemanticTokensServerCapabilities, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, Url, WorkDoneProgressOptions,
};
use tower_lsp::Client;
use tracing::{debug, info};

pub trait LspClient: Send + Sync + Clone + 'static {}
impl LspClient for Client {}

pub trait FeatureProvider: Send + Sync + 'static {
    fn semantic_tokens(&self, text: &str) -> Vec<HighlightSpan>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider {
    value_span: ValueSpanMode,
}

impl DefaultFeatureProvider {
    pub fn new(value_span: ValueSpanMode) -> Self {
        Self { value_span }
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn semantic_tokens(&self, text: &str) -> Vec<HighlightSpan> {
        collect_semantic_spans(text, self.value_span)
    }
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, text: String) {
        self.entries.write().await.insert(uri, Arc::new(text));
    }

    async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

pub struct LayerfileLanguageServer<C = Client, P = DefaultFeatureProvider> {
    _client: C,
    documents: DocumentStore,
    features: Arc<P>,
    legend: Legend,
    document_schemes: Vec<String>,
}

impl LayerfileLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: &LayerfileConfig) -> Self {
        Self::with_features(
            client,
            Arc::new(DefaultFeatureProvider::new(config.highlighting.value_span)),
            config.server.document_schemes.clone(),
        )
    }
}

impl<C, P> LayerfileLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, document_schemes: Vec<String>) -> Self {
        Self {
            _client: client,
            documents: DocumentStore::default(),
            features,
            legend: Legend::standard(),
            document_schemes,
        }
    }

    fn tracks(&self, uri: &Url) -> bool {
        self.document_schemes
            .iter()
            .any(|scheme| scheme == uri.scheme())
    }

    async fn store(&self, uri: Url, text: String) {
        if self.tracks(&uri) {
            self.documents.upsert(uri, text).await;
        } else {
            debug!(%uri, "ignoring document with untracked scheme");
        }
    }
}

/// Encode spans in the LSP relative format, in the order given.
///
/// Zero-length spans cannot be represented and are dropped.
pub fn encode_semantic_tokens(spans: &[HighlightSpan], legend: &Legend) -> Vec<SemanticToken> {
    let mut data = Vec::with_capacity(spans.len());
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for span in spans {
        if span.length == 0 {
            continue;
        }
        let delta_line = span.line.saturating_sub(prev_line);
        let delta_start = if delta_line == 0 {
            span.start_character.saturating_sub(prev_start)
        } else {
            span.start_character
        };
        data.push(SemanticToken {
            delta_line,
            delta_start,
            length: span.length,
            token_type: legend.index_of(span.category.as_str()),
            token_modifiers_bitset: legend.modifier_bitset(&span.modifiers),
        });
        prev_line = span.line;
        prev_start = span.start_character;
    }

    data
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for LayerfileLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            semantic_tokens_provider: Some(
                SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    legend: self.legend.to_lsp(),
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                }),
            ),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "layerfile-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("layerfile-lsp initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("layerfile-lsp shutting down");
        Ok(())
    }

    async fn did_open(&self, params: tower_lsp::lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem { uri, text, .. } = params.text_document;
        self.store(uri, text).await;
    }

    async fn did_change(&self, params: tower_lsp::lsp_types::DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            self.store(params.text_document.uri, change.text).await;
        }
    }

    async fn did_close(&self, params: tower_lsp::lsp_types::DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri).await;
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let uri = params.text_document.uri;
        if let Some(text) = self.documents.get(&uri).await {
            let spans = self.features.semantic_tokens(text.as_str());
            let data = encode_semantic_tokens(&spans, &self.legend);
            debug!(%uri, tokens = data.len(), "semantic tokens");
            Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
                result_id: None,
                data,
            })))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::legend::Category;
    use crate::features::test_support::sample_source;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
        SemanticTokensParams, TextDocumentContentChangeEvent, TextDocumentIdentifier,
        TextDocumentItem, VersionedTextDocumentIdentifier,
    };
    use tower_lsp::LanguageServer;

    #[derive(Clone, Default)]
    struct NoopClient;
    impl LspClient for NoopClient {}

    #[derive(Default)]
    struct MockFeatureProvider {
        semantic_tokens_called: AtomicUsize,
        last_text: Mutex<Option<String>>,
    }

    impl FeatureProvider for MockFeatureProvider {
        fn semantic_tokens(&self, text: &str) -> Vec<HighlightSpan> {
            self.semantic_tokens_called.fetch_add(1, Ordering::SeqCst);
            *self.last_text.lock().unwrap() = Some(text.to_string());
            vec![HighlightSpan::new(0, 0, 3, Category::Keyword)]
        }
    }

    fn sample_uri() -> Url {
        Url::parse("file:///project/Layerfile").unwrap()
    }

    fn file_schemes() -> Vec<String> {
        vec!["file".to_string()]
    }

    fn mock_server() -> (
        Arc<MockFeatureProvider>,
        LayerfileLanguageServer<NoopClient, MockFeatureProvider>,
    ) {
        let provider = Arc::new(MockFeatureProvider::default());
        let server =
            LayerfileLanguageServer::with_features(NoopClient, provider.clone(), file_schemes());
        (provider, server)
    }

    fn tokens_params(uri: Url) -> SemanticTokensParams {
        SemanticTokensParams {
            text_document: TextDocumentIdentifier { uri },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        }
    }

    async fn open<C: LspClient, P: FeatureProvider>(
        server: &LayerfileLanguageServer<C, P>,
        uri: Url,
        text: &str,
    ) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri,
                    language_id: "Layerfile".into(),
                    version: 1,
                    text: text.to_string(),
                },
            })
            .await;
    }

    fn data(result: SemanticTokensResult) -> Vec<SemanticToken> {
        match result {
            SemanticTokensResult::Tokens(tokens) => tokens.data,
            SemanticTokensResult::Partial(partial) => partial.data,
        }
    }

    #[test]
    fn encode_uses_relative_positions() {
        let spans = vec![
            HighlightSpan::new(0, 0, 3, Category::Keyword),
            HighlightSpan::new(0, 4, 3, Category::Variable),
            HighlightSpan::new(0, 8, 3, Category::String),
            HighlightSpan::new(2, 2, 4, Category::Comment),
        ];
        let encoded = encode_semantic_tokens(&spans, &Legend::standard());
        let tuples: Vec<_> = encoded
            .iter()
            .map(|token| {
                (
                    token.delta_line,
                    token.delta_start,
                    token.length,
                    token.token_type,
                    token.token_modifiers_bitset,
                )
            })
            .collect();
        assert_eq!(
            tuples,
            vec![
                (0, 0, 3, 2, 0),
                (0, 4, 3, 17, 0),
                (0, 4, 3, 1, 0),
                (2, 2, 4, 0, 0),
            ]
        );
    }

    #[test]
    fn encode_skips_zero_length_spans() {
        let spans = vec![
            HighlightSpan::new(0, 0, 3, Category::Variable),
            HighlightSpan::new(0, 4, 0, Category::String),
            HighlightSpan::new(0, 6, 2, Category::Comment),
        ];
        let encoded = encode_semantic_tokens(&spans, &Legend::standard());
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[1].delta_start, 6);
    }

    #[tokio::test]
    async fn initialize_advertises_legend() {
        let (_, server) = mock_server();
        let result = server.initialize(InitializeParams::default()).await.unwrap();
        match result.capabilities.semantic_tokens_provider {
            Some(SemanticTokensServerCapabilities::SemanticTokensOptions(options)) => {
                assert_eq!(options.legend.token_types.len(), 21);
                assert_eq!(options.legend.token_modifiers.len(), 8);
                assert_eq!(options.full, Some(SemanticTokensFullOptions::Bool(true)));
            }
            other => panic!("unexpected semantic tokens capability: {:?}", other),
        }
    }

    #[tokio::test]
    async fn semantic_tokens_call_feature_layer() {
        let (provider, server) = mock_server();
        open(&server, sample_uri(), sample_source()).await;

        let result = server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(provider.semantic_tokens_called.load(Ordering::SeqCst), 1);
        assert_eq!(data(result).len(), 1);
        assert_eq!(
            provider.last_text.lock().unwrap().as_deref(),
            Some(sample_source())
        );
    }

    #[tokio::test]
    async fn did_change_replaces_text() {
        let (provider, server) = mock_server();
        open(&server, sample_uri(), "RUN make").await;
        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "RUN make test".into(),
                }],
            })
            .await;

        server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap();
        assert_eq!(
            provider.last_text.lock().unwrap().as_deref(),
            Some("RUN make test")
        );
    }

    #[tokio::test]
    async fn did_close_forgets_document() {
        let (_, server) = mock_server();
        open(&server, sample_uri(), "RUN make").await;
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;

        let result = server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn semantic_tokens_returns_none_when_document_missing() {
        let (provider, server) = mock_server();

        let result = server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(provider.semantic_tokens_called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn untracked_schemes_are_ignored() {
        let (_, server) = mock_server();
        let uri = Url::parse("untitled:Layerfile-1").unwrap();
        open(&server, uri.clone(), "RUN make").await;

        let result = server.semantic_tokens_full(tokens_params(uri)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn default_provider_highlights_sample() {
        let server = LayerfileLanguageServer::with_features(
            NoopClient,
            Arc::new(DefaultFeatureProvider::default()),
            file_schemes(),
        );
        open(&server, sample_uri(), sample_source()).await;

        let result = server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap()
            .unwrap();
        let data = data(result);
        // First line is the comment
        assert_eq!(data[0].delta_line, 0);
        assert_eq!(data[0].token_type, 0);
        // Then the FROM keyword
        assert_eq!(data[1].delta_line, 1);
        assert_eq!(data[1].token_type, 2);
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let server = LayerfileLanguageServer::with_features(
            NoopClient,
            Arc::new(DefaultFeatureProvider::default()),
            file_schemes(),
        );
        open(&server, sample_uri(), sample_source()).await;

        let first = server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap()
            .unwrap();
        let second = server
            .semantic_tokens_full(tokens_params(sample_uri()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(data(first), data(second));
    }
}

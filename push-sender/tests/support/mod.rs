use integration_test_utils::ScriptedClientFactory;
use push_sender::{
    AuthorizationError, CredentialSource, DefaultAuthorizationProviderFactory,
    EndpointAddressResolver, HttpAuthorizationProviderFactory, HttpMessageSenderProvider,
    InterpolatingEndpointAddressResolver, SenderConfig, StaticCredential, Subscription,
    TraceMetadataAppender,
};
use std::sync::Arc;

#[allow(dead_code)]
pub(crate) fn config(http2_enabled: bool) -> SenderConfig {
    SenderConfig {
        http2_enabled,
        ..SenderConfig::default()
    }
}

#[allow(dead_code)]
pub(crate) fn make_provider(
    config: &SenderConfig,
    factory: &ScriptedClientFactory,
) -> HttpMessageSenderProvider {
    make_provider_with(
        config,
        factory,
        Arc::new(InterpolatingEndpointAddressResolver::new()),
        Arc::new(DefaultAuthorizationProviderFactory::new()),
    )
}

#[allow(dead_code)]
pub(crate) fn make_provider_with(
    config: &SenderConfig,
    factory: &ScriptedClientFactory,
    resolver: Arc<dyn EndpointAddressResolver>,
    authorization: Arc<dyn HttpAuthorizationProviderFactory>,
) -> HttpMessageSenderProvider {
    HttpMessageSenderProvider::new(
        config,
        factory,
        resolver,
        Arc::new(TraceMetadataAppender::new()),
        authorization,
    )
}

/// Attaches the same `Authorization` value to every subscription.
#[allow(dead_code)]
pub(crate) struct FixedAuthorization(pub(crate) &'static str);

impl HttpAuthorizationProviderFactory for FixedAuthorization {
    fn create(
        &self,
        _subscription: &Subscription,
    ) -> Result<Option<Arc<dyn CredentialSource>>, AuthorizationError> {
        Ok(Some(Arc::new(StaticCredential::authorization(self.0)?)))
    }
}

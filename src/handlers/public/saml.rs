use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::config::{self, SamlConfig};

/// GET /saml/metadata - publish the service-provider entity descriptor.
/// Returns 404 when the SAML feature flag is off, matching unknown routes.
pub async fn metadata() -> impl IntoResponse {
    let cfg = &config::config().saml;

    if !cfg.enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    (
        [(header::CONTENT_TYPE, "application/xml")],
        entity_descriptor(cfg),
    )
        .into_response()
}

fn entity_descriptor(cfg: &SamlConfig) -> String {
    format!(
        r#"<?xml version="1.0"?>
<md:EntityDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" entityID="{entity_id}">
  <md:SPSSODescriptor AuthnRequestsSigned="false" WantAssertionsSigned="true" protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">
    <md:KeyDescriptor use="signing">
      <ds:KeyInfo xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
        <ds:X509Data>
          <ds:X509Certificate>{certificate}</ds:X509Certificate>
        </ds:X509Data>
      </ds:KeyInfo>
    </md:KeyDescriptor>
    <md:NameIDFormat>urn:oasis:names:tc:SAML:2.0:nameid-format:persistent</md:NameIDFormat>
    <md:AssertionConsumerService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" Location="{acs_url}" index="1"/>
  </md:SPSSODescriptor>
</md:EntityDescriptor>
"#,
        entity_id = cfg.entity_id,
        certificate = cfg.certificate,
        acs_url = cfg.acs_url,
    )
}

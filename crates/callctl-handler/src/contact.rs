// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use callctl_ari::event::ContactStatusChange;
use callctl_core::CallctlError;

use crate::EventHandler;

/// Splits an `extension@customer.<registrar suffix>` resource into
/// `(customer, extension)`.
fn split_resource(resource: &str) -> Result<(&str, &str), CallctlError> {
    let (extension, domain) = resource
        .split_once('@')
        .ok_or_else(|| CallctlError::InvalidResource(resource.to_string()))?;
    let customer = domain.split_once('.').map_or(domain, |(label, _)| label);
    Ok((customer, extension))
}

impl EventHandler {
    pub(crate) async fn contact_status_change(
        &self,
        e: &ContactStatusChange,
    ) -> Result<(), CallctlError> {
        let (customer_id, extension) = split_resource(&e.endpoint.resource)?;
        self.requests
            .registrar_contact_refresh(customer_id, extension)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_splits_into_customer_and_extension() {
        assert_eq!(
            split_resource("test11@test.trunk.voipbin.net").unwrap(),
            ("test", "test11")
        );
        assert_eq!(
            split_resource("2000@5e4a0680-804e-11ec-8477-2fea5968d85b.registrar.voipbin.net")
                .unwrap(),
            ("5e4a0680-804e-11ec-8477-2fea5968d85b", "2000")
        );
        assert_eq!(split_resource("1000@local").unwrap(), ("local", "1000"));
    }

    #[test]
    fn resource_without_at_is_invalid() {
        let err = split_resource("test11.trunk.voipbin.net").unwrap_err();
        assert!(matches!(err, CallctlError::InvalidResource(_)));
    }
}

use crate::domain::{Device, DeviceType};
use crate::inventory::device_list::normalize;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{info, instrument};

/// Source of the room's device lists.
#[async_trait]
pub trait Inventory: Debug + Send + Sync {
    async fn devices(&self, r#type: DeviceType) -> Result<Vec<Device>, InventoryError>;
}

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("requesting the {0} list failed: {1}")]
    Request(DeviceType, #[source] reqwest::Error),
    #[error("the {0} list request failed with status {1}")]
    Status(DeviceType, StatusCode),
    #[error("the {0} list response could not be read: {1}")]
    Body(DeviceType, #[source] reqwest::Error),
}

#[derive(Debug)]
pub struct HttpInventory {
    client: Client,
    url: String,
}

impl HttpInventory {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        HttpInventory { client, url: url.into() }
    }
}

fn list_path(r#type: DeviceType) -> &'static str {
    match r#type {
        DeviceType::Projector => "/api/projector/list",
        DeviceType::Pc => "/api/pc/list",
        DeviceType::Pdu => "/api/pdu/list",
    }
}

#[async_trait]
impl Inventory for HttpInventory {
    #[instrument(skip_all, fields(device_type = %r#type))]
    async fn devices(&self, r#type: DeviceType) -> Result<Vec<Device>, InventoryError> {
        info!("📡 Retrieving {} list...", r#type);

        let response = self
            .client
            .get(format!("{}{}", self.url, list_path(r#type)))
            .send()
            .await
            .map_err(|e| InventoryError::Request(r#type, e))?;

        if !response.status().is_success() {
            return Err(InventoryError::Status(r#type, response.status()));
        }

        let body = response.json::<Value>().await.map_err(|e| InventoryError::Body(r#type, e))?;
        let devices = normalize(&body, r#type);
        info!("📡 Retrieving {} list... OK, {} found", r#type, devices.len());

        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NetworkStatus, PowerStatus};
    use crate::inventory::client::new_client;
    use pretty_assertions::assert_eq;
    use test_log::test;

    async fn serve(server: &mut mockito::ServerGuard, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[test(tokio::test)]
    async fn retrieves_projectors() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mock = serve(&mut server, "/api/projector/list", include_str!("../../tests/resources/projector_list.json")).await;

        let inventory = HttpInventory::new(new_client()?, server.url());
        let projectors = inventory.devices(DeviceType::Projector).await?;

        mock.assert_async().await;
        assert_eq!(
            projectors[0],
            Device {
                id: "1".to_string(),
                raw_id: Value::from("1"),
                r#type: DeviceType::Projector,
                name: "Front projector".to_string(),
                ip: "192.168.0.21".to_string(),
                mac: None,
                port: None,
                network_status: NetworkStatus::Online,
                power_status: PowerStatus::Warming,
            }
        );
        assert_eq!(projectors[1].network_status, NetworkStatus::Offline);
        assert_eq!(projectors.len(), 2);

        Ok(())
    }

    #[test(tokio::test)]
    async fn retrieves_pcs() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mock = serve(&mut server, "/api/pc/list", include_str!("../../tests/resources/pc_list.json")).await;

        let inventory = HttpInventory::new(new_client()?, server.url());
        let pcs = inventory.devices(DeviceType::Pc).await?;

        mock.assert_async().await;
        assert_eq!(pcs.len(), 3);
        assert_eq!(pcs[0].mac.as_deref(), Some("00:1A:2B:3C:4D:5E"));
        assert_eq!(pcs[0].power_status, PowerStatus::On);
        assert_eq!(pcs[1].network_status, NetworkStatus::Online);
        assert_eq!(pcs[1].power_status, PowerStatus::ShuttingDown);
        assert_eq!(pcs[2].power_status, PowerStatus::Off);

        Ok(())
    }

    #[test(tokio::test)]
    async fn retrieves_pdus() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mock = serve(&mut server, "/api/pdu/list", include_str!("../../tests/resources/pdu_list.json")).await;

        let inventory = HttpInventory::new(new_client()?, server.url());
        let pdus = inventory.devices(DeviceType::Pdu).await?;

        mock.assert_async().await;
        assert_eq!(pdus.len(), 1);
        assert_eq!(pdus[0].port, Some(3));
        assert_eq!(pdus[0].power_status, PowerStatus::On);

        Ok(())
    }

    #[test(tokio::test)]
    async fn fails_on_an_error_status() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/api/pc/list").with_status(503).create_async().await;

        let inventory = HttpInventory::new(new_client()?, server.url());
        let result = inventory.devices(DeviceType::Pc).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(InventoryError::Status(DeviceType::Pc, StatusCode::SERVICE_UNAVAILABLE))));

        Ok(())
    }

    #[test(tokio::test)]
    async fn fails_on_a_body_that_is_not_json() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mock = serve(&mut server, "/api/projector/list", "<html>maintenance</html>").await;

        let inventory = HttpInventory::new(new_client()?, server.url());
        let result = inventory.devices(DeviceType::Projector).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(InventoryError::Body(DeviceType::Projector, _))));

        Ok(())
    }
}

use crate::BridgeError;
use domain::{AuthToken, Credentials, InstallationTarget};
use tracing::{info, warn};
use wolf_catalog::Catalog;
use wolf_vendor::VendorApi;

/// 选中的安装及其参数目录。
#[derive(Debug, Clone)]
pub struct Installation {
    pub target: InstallationTarget,
    pub catalog: Catalog,
}

/// 取账号下的第一个系统，并拉取它的 GUI 描述构建目录。
pub async fn fetch_installation(
    vendor: &dyn VendorApi,
    token: &AuthToken,
    root_topic: &str,
) -> Result<Installation, BridgeError> {
    let systems = vendor
        .system_list(token)
        .await
        .map_err(|err| BridgeError::CatalogFetch(err.to_string()))?;
    let target = systems
        .into_iter()
        .next()
        .ok_or(BridgeError::NoInstallation)?;
    let gui = vendor
        .gui_description(token, &target)
        .await
        .map_err(|err| BridgeError::CatalogFetch(err.to_string()))?;
    let catalog = Catalog::from_gui(&gui);
    info!(
        target: "wolf.bridge",
        system_id = target.system_id,
        gateway_id = target.gateway_id,
        name = %target.name,
        software_version = %target.software_version,
        parameters = catalog.len(),
        "installation_selected"
    );
    for (topic, value_ids) in catalog.topic_collisions(root_topic) {
        warn!(target: "wolf.bridge", topic = %topic, ?value_ids, "topic_collision");
    }
    Ok(Installation { target, catalog })
}

/// `list` 子命令使用：只认证，不建立会话。
pub async fn load_installation(
    vendor: &dyn VendorApi,
    credentials: &Credentials,
    root_topic: &str,
) -> Result<Installation, BridgeError> {
    let token = vendor
        .authenticate(credentials)
        .await
        .map_err(|err| BridgeError::Auth(err.to_string()))?;
    fetch_installation(vendor, &token, root_topic).await
}

//! Shared fixtures: the sample configuration tree under `deploy/`, mounted
//! in memory at `/repo`

#![allow(dead_code)]

use stackconf::config::{ConfigManager, ManagerOptions};
use stackconf::remote::ParameterStore;
use stackconf::system::{MockSystem, System};
use std::path::PathBuf;

pub const ROOT: &str = "/repo";

pub fn fixture_system() -> MockSystem {
    MockSystem::new()
        .with_file("/repo/conf/schema.json", include_bytes!("../../deploy/conf/schema.json"))
        .unwrap()
        .with_file("/repo/conf/dev.json", include_bytes!("../../deploy/conf/dev.json"))
        .unwrap()
        .with_file("/repo/conf/prod.json", include_bytes!("../../deploy/conf/prod.json"))
        .unwrap()
        .with_file("/repo/app/conf/schema.json", include_bytes!("../../deploy/app/conf/schema.json"))
        .unwrap()
        .with_file("/repo/app/conf/dev.json", include_bytes!("../../deploy/app/conf/dev.json"))
        .unwrap()
        .with_file(
            "/repo/app/conf/dev-overrides.json",
            include_bytes!("../../deploy/app/conf/dev-overrides.json"),
        )
        .unwrap()
        .with_file("/repo/fw/conf/schema.json", include_bytes!("../../deploy/fw/conf/schema.json"))
        .unwrap()
        .with_file("/repo/fw/conf/dev.json", include_bytes!("../../deploy/fw/conf/dev.json"))
        .unwrap()
        .with_file("/repo/vpc/conf/schema.json", include_bytes!("../../deploy/vpc/conf/schema.json"))
        .unwrap()
        .with_file("/repo/vpc/conf/dev.json", include_bytes!("../../deploy/vpc/conf/dev.json"))
        .unwrap()
}

pub fn options() -> ManagerOptions {
    ManagerOptions {
        namespace: "stackconf".to_owned(),
        root: PathBuf::from(ROOT),
    }
}

pub fn manager<'a>(system: &'a dyn System, store: &'a dyn ParameterStore) -> ConfigManager<'a> {
    ConfigManager::new(system, store, options())
}

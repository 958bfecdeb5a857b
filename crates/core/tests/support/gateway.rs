use std::sync::Mutex;

use async_trait::async_trait;
use uhome_core::DeviceGateway;
use uhome_domain::{
    DeviceCommand, DeviceStateReport, DeviceTarget, Result as DomainResult, StateEntry,
};

/// In-memory mock for `DeviceGateway`.
///
/// Records every query and command and answers with scripted state
/// reports.
#[derive(Default)]
pub struct MockDeviceGateway {
    commands: Mutex<Vec<(DeviceTarget, DeviceCommand)>>,
    queries: Mutex<Vec<Vec<DeviceTarget>>>,
    query_reports: Mutex<Vec<DeviceStateReport>>,
    command_report: Mutex<Option<DeviceStateReport>>,
}

impl MockDeviceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every query with these reports.
    pub fn with_query_reports(self, reports: Vec<DeviceStateReport>) -> Self {
        *self.query_reports.lock().unwrap() = reports;
        self
    }

    /// Answer every command with this report.
    pub fn with_command_report(self, report: DeviceStateReport) -> Self {
        *self.command_report.lock().unwrap() = Some(report);
        self
    }

    pub fn commands(&self) -> Vec<(DeviceTarget, DeviceCommand)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<Vec<DeviceTarget>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.commands.lock().unwrap().len() + self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl DeviceGateway for MockDeviceGateway {
    async fn query_devices(
        &self,
        targets: &[DeviceTarget],
    ) -> DomainResult<Vec<DeviceStateReport>> {
        self.queries.lock().unwrap().push(targets.to_vec());
        Ok(self.query_reports.lock().unwrap().clone())
    }

    async fn send_command(
        &self,
        target: &DeviceTarget,
        command: &DeviceCommand,
    ) -> DomainResult<Option<DeviceStateReport>> {
        self.commands.lock().unwrap().push((target.clone(), command.clone()));
        Ok(self.command_report.lock().unwrap().clone())
    }
}

pub fn report(id: &str, states: &[(&str, &str, serde_json::Value)]) -> DeviceStateReport {
    DeviceStateReport {
        id: id.to_string(),
        states: states
            .iter()
            .map(|(capability, name, value)| StateEntry {
                capability: (*capability).into(),
                name: (*name).to_string(),
                value: value.clone(),
            })
            .collect(),
    }
}

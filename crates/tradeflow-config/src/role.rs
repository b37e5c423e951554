use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a user acts under when requesting or deciding an approval.
///
/// The set is closed: every step names one of these as its required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRole {
  Admin,
  Manager,
  Operator,
  Viewer,
  Buyer,
  PurchasingManager,
  ImportClerk,
  ImportAnalyst,
  CustomsBroker,
  LogisticsAgent,
  LogisticsCoordinator,
  Finance,
  FinanceManager,
  WarehouseOperator,
}

impl ApprovalRole {
  pub const ALL: [ApprovalRole; 14] = [
    ApprovalRole::Admin,
    ApprovalRole::Manager,
    ApprovalRole::Operator,
    ApprovalRole::Viewer,
    ApprovalRole::Buyer,
    ApprovalRole::PurchasingManager,
    ApprovalRole::ImportClerk,
    ApprovalRole::ImportAnalyst,
    ApprovalRole::CustomsBroker,
    ApprovalRole::LogisticsAgent,
    ApprovalRole::LogisticsCoordinator,
    ApprovalRole::Finance,
    ApprovalRole::FinanceManager,
    ApprovalRole::WarehouseOperator,
  ];

  /// The wire name, as used in catalog files.
  pub fn as_str(&self) -> &'static str {
    match self {
      ApprovalRole::Admin => "admin",
      ApprovalRole::Manager => "manager",
      ApprovalRole::Operator => "operator",
      ApprovalRole::Viewer => "viewer",
      ApprovalRole::Buyer => "buyer",
      ApprovalRole::PurchasingManager => "purchasing_manager",
      ApprovalRole::ImportClerk => "import_clerk",
      ApprovalRole::ImportAnalyst => "import_analyst",
      ApprovalRole::CustomsBroker => "customs_broker",
      ApprovalRole::LogisticsAgent => "logistics_agent",
      ApprovalRole::LogisticsCoordinator => "logistics_coordinator",
      ApprovalRole::Finance => "finance",
      ApprovalRole::FinanceManager => "finance_manager",
      ApprovalRole::WarehouseOperator => "warehouse_operator",
    }
  }

  /// Human readable label for display.
  pub fn label(&self) -> &'static str {
    match self {
      ApprovalRole::Admin => "Administrator",
      ApprovalRole::Manager => "Manager",
      ApprovalRole::Operator => "Operator",
      ApprovalRole::Viewer => "Viewer",
      ApprovalRole::Buyer => "Buyer",
      ApprovalRole::PurchasingManager => "Purchasing Manager",
      ApprovalRole::ImportClerk => "Import Clerk",
      ApprovalRole::ImportAnalyst => "Import Analyst",
      ApprovalRole::CustomsBroker => "Customs Broker",
      ApprovalRole::LogisticsAgent => "Logistics Agent",
      ApprovalRole::LogisticsCoordinator => "Logistics Coordinator",
      ApprovalRole::Finance => "Finance",
      ApprovalRole::FinanceManager => "Finance Manager",
      ApprovalRole::WarehouseOperator => "Warehouse Operator",
    }
  }
}

impl fmt::Display for ApprovalRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when parsing a role name that is not part of [`ApprovalRole`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown approval role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for ApprovalRole {
  type Err = UnknownRole;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ApprovalRole::ALL
      .into_iter()
      .find(|role| role.as_str() == s)
      .ok_or_else(|| UnknownRole(s.to_string()))
  }
}

//! Approval workflow for adjustments, deposits and deliveries.
//!
//! ```text
//! pending --approve--> approved
//! pending --reject---> rejected
//! ```
//!
//! Resolved entities never transition again. Approving or rejecting
//! requires full access on the entity's resource; creating follows the
//! kind's [`CreateRule`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SpbuError, SpbuResult};
use crate::models::Validate;
use crate::models::adjustment::{Adjustment, CreateAdjustment};
use crate::models::delivery::{CreateDelivery, Delivery};
use crate::models::deposit::{CreateDeposit, Deposit};
use crate::models::user::User;
use crate::permission::{self, AccessLevel, ResourceKey};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    /// Deliveries call this state `confirmed`.
    #[serde(alias = "confirmed")]
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn is_resolved(&self) -> bool {
        *self != ApprovalStatus::Pending
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(&self) -> ApprovalStatus {
        match self {
            Decision::Approve => ApprovalStatus::Approved,
            Decision::Reject => ApprovalStatus::Rejected,
        }
    }
}

/// Approval bookkeeping embedded in every approval-bearing entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub status: ApprovalStatus,
    /// User who created the entity.
    pub operator_id: i64,
    #[serde(default)]
    pub approved_by: Option<i64>,
    #[serde(default)]
    pub rejected_by: Option<i64>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl Approval {
    pub fn pending(operator_id: i64) -> Self {
        Self {
            status: ApprovalStatus::Pending,
            operator_id,
            approved_by: None,
            rejected_by: None,
            decided_at: None,
        }
    }

    /// Check that `decision` is a legal transition from the current state.
    pub fn check(&self, entity: &str, id: i64) -> SpbuResult<()> {
        if self.status.is_resolved() {
            return Err(SpbuError::InvalidTransition {
                entity: entity.into(),
                id,
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Apply `decision` by `actor_id`. Fails if already resolved, in which
    /// case nothing is modified.
    pub fn apply(
        &mut self,
        entity: &str,
        id: i64,
        decision: Decision,
        actor_id: i64,
        at: DateTime<Utc>,
    ) -> SpbuResult<()> {
        self.check(entity, id)?;
        self.status = decision.target();
        match decision {
            Decision::Approve => self.approved_by = Some(actor_id),
            Decision::Reject => self.rejected_by = Some(actor_id),
        }
        self.decided_at = Some(at);
        Ok(())
    }
}

/// Change to a tank's stock caused by approving an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockEffect {
    pub tank_id: i64,
    /// Litres; negative draws the tank down.
    pub delta: f64,
}

pub trait Approvable {
    fn id(&self) -> i64;
    fn spbu_id(&self) -> i64;
    fn approval(&self) -> &Approval;
    fn approval_mut(&mut self) -> &mut Approval;

    /// Stock change applied when this entity is approved.
    fn stock_effect(&self) -> Option<StockEffect> {
        None
    }

    fn status(&self) -> ApprovalStatus {
        self.approval().status
    }
}

/// Who may create entities of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateRule {
    /// Exactly limited access: creation is reserved for operators, and
    /// approvers may not create what they approve.
    LimitedOnly,
    /// Limited access or better.
    LimitedOrBetter,
}

impl CreateRule {
    pub fn permits(&self, level: AccessLevel) -> bool {
        match self {
            CreateRule::LimitedOnly => level == AccessLevel::Limited,
            CreateRule::LimitedOrBetter => level >= AccessLevel::Limited,
        }
    }
}

/// An approval-bearing entity type.
pub trait ApprovalKind: Send + Sync + 'static {
    type Entity: Approvable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Create: Validate + Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Singular entity name used in messages.
    const NAME: &'static str;
    const RESOURCE: ResourceKey;
    /// Collection path segment under `/api`.
    const PATH: &'static str;
    /// Path segment of the approve action.
    const APPROVE_ACTION: &'static str = "approve";
    const REJECT_ACTION: &'static str = "reject";
    const CREATE_RULE: CreateRule;

    /// Station named by the create payload, if any.
    fn requested_station(input: &Self::Create) -> Option<i64>;

    /// Build a new pending entity.
    fn build(
        id: i64,
        spbu_id: i64,
        operator_id: i64,
        input: Self::Create,
        now: DateTime<Utc>,
    ) -> Self::Entity;
}

pub struct Adjustments;
pub struct Deposits;
pub struct Deliveries;

impl ApprovalKind for Adjustments {
    type Entity = Adjustment;
    type Create = CreateAdjustment;

    const NAME: &'static str = "adjustment";
    const RESOURCE: ResourceKey = ResourceKey::Adjustments;
    const PATH: &'static str = "adjustments";
    const CREATE_RULE: CreateRule = CreateRule::LimitedOnly;

    fn requested_station(input: &CreateAdjustment) -> Option<i64> {
        input.spbu_id
    }

    fn build(
        id: i64,
        spbu_id: i64,
        operator_id: i64,
        input: CreateAdjustment,
        now: DateTime<Utc>,
    ) -> Adjustment {
        Adjustment {
            id,
            spbu_id,
            target: input.target,
            tank_id: input.tank_id,
            adjustment_type: input.adjustment_type,
            quantity: input.quantity,
            description: input.description,
            approval: Approval::pending(operator_id),
            created_at: now,
        }
    }
}

impl ApprovalKind for Deposits {
    type Entity = Deposit;
    type Create = CreateDeposit;

    const NAME: &'static str = "deposit";
    const RESOURCE: ResourceKey = ResourceKey::Deposits;
    const PATH: &'static str = "deposits";
    const CREATE_RULE: CreateRule = CreateRule::LimitedOrBetter;

    fn requested_station(input: &CreateDeposit) -> Option<i64> {
        input.spbu_id
    }

    fn build(
        id: i64,
        spbu_id: i64,
        operator_id: i64,
        input: CreateDeposit,
        now: DateTime<Utc>,
    ) -> Deposit {
        Deposit {
            id,
            spbu_id,
            amount: input.amount,
            method: input.method,
            deposit_date: input.deposit_date,
            notes: input.notes,
            approval: Approval::pending(operator_id),
            created_at: now,
        }
    }
}

impl ApprovalKind for Deliveries {
    type Entity = Delivery;
    type Create = CreateDelivery;

    const NAME: &'static str = "delivery";
    const RESOURCE: ResourceKey = ResourceKey::Deliveries;
    const PATH: &'static str = "deliveries";
    const APPROVE_ACTION: &'static str = "confirm";
    const CREATE_RULE: CreateRule = CreateRule::LimitedOrBetter;

    fn requested_station(input: &CreateDelivery) -> Option<i64> {
        input.spbu_id
    }

    fn build(
        id: i64,
        spbu_id: i64,
        operator_id: i64,
        input: CreateDelivery,
        now: DateTime<Utc>,
    ) -> Delivery {
        Delivery {
            id,
            spbu_id,
            tank_id: input.tank_id,
            supplier: input.supplier,
            volume: input.volume,
            delivery_order_number: input.delivery_order_number,
            approval: Approval::pending(operator_id),
            created_at: now,
        }
    }
}

pub fn can_create<K: ApprovalKind>(user: Option<&User>) -> bool {
    K::CREATE_RULE.permits(permission::access_for(user, K::RESOURCE))
}

pub fn can_decide<K: ApprovalKind>(user: Option<&User>) -> bool {
    permission::access_for(user, K::RESOURCE) == AccessLevel::Full
}

pub fn authorize_create<K: ApprovalKind>(user: &User) -> SpbuResult<()> {
    if can_create::<K>(Some(user)) {
        Ok(())
    } else {
        Err(SpbuError::denied(format!(
            "{} may not create {} records",
            user.username,
            K::NAME
        )))
    }
}

/// Check that `actor` may decide on `entity`: full access on the
/// resource and visibility of the entity's station.
pub fn authorize_decision<K: ApprovalKind>(actor: &User, entity: &K::Entity) -> SpbuResult<()> {
    if !can_decide::<K>(Some(actor)) {
        return Err(SpbuError::denied(format!(
            "{} may not approve or reject {} records",
            actor.username,
            K::NAME
        )));
    }
    if !permission::can_view_station(actor, entity.spbu_id()) {
        return Err(SpbuError::denied(format!(
            "{} cannot act on station {}",
            actor.username,
            entity.spbu_id()
        )));
    }
    Ok(())
}

/// Authorize and apply a decision to a pending entity.
pub fn decide<K: ApprovalKind>(
    entity: &mut K::Entity,
    decision: Decision,
    actor: &User,
    at: DateTime<Utc>,
) -> SpbuResult<()> {
    authorize_decision::<K>(actor, entity)?;
    let id = entity.id();
    entity
        .approval_mut()
        .apply(K::NAME, id, decision, actor.id, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::adjustment::{AdjustmentTarget, AdjustmentType};

    fn user(id: i64, roles: &[&str], spbu_id: Option<i64>) -> User {
        User {
            id,
            username: format!("user{id}"),
            name: format!("User {id}"),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            spbu_id,
            created_at: Utc::now(),
        }
    }

    fn adjustment(spbu_id: i64) -> Adjustment {
        Adjustments::build(
            1,
            spbu_id,
            10,
            CreateAdjustment {
                spbu_id: None,
                target: AdjustmentTarget::Fuel,
                tank_id: Some(5),
                adjustment_type: AdjustmentType::Gain,
                quantity: 100.0,
                description: "test".into(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn new_entities_are_pending() {
        let adj = adjustment(1);
        assert_eq!(adj.status(), ApprovalStatus::Pending);
        assert_eq!(adj.approval.operator_id, 10);
        assert!(adj.approval.approved_by.is_none());
    }

    #[test]
    fn approve_is_terminal() {
        let admin = user(2, &["Admin"], Some(1));
        let mut adj = adjustment(1);

        decide::<Adjustments>(&mut adj, Decision::Approve, &admin, Utc::now()).unwrap();
        assert_eq!(adj.status(), ApprovalStatus::Approved);
        assert_eq!(adj.approval.approved_by, Some(2));

        let err = decide::<Adjustments>(&mut adj, Decision::Reject, &admin, Utc::now())
            .unwrap_err();
        assert!(matches!(err, SpbuError::InvalidTransition { .. }));
        assert_eq!(adj.status(), ApprovalStatus::Approved);
        assert!(adj.approval.rejected_by.is_none());
    }

    #[test]
    fn reject_is_terminal() {
        let admin = user(2, &["Admin"], Some(1));
        let mut adj = adjustment(1);

        decide::<Adjustments>(&mut adj, Decision::Reject, &admin, Utc::now()).unwrap();
        assert_eq!(adj.status(), ApprovalStatus::Rejected);
        assert!(decide::<Adjustments>(&mut adj, Decision::Approve, &admin, Utc::now()).is_err());
        assert!(decide::<Adjustments>(&mut adj, Decision::Reject, &admin, Utc::now()).is_err());
        assert_eq!(adj.approval.rejected_by, Some(2));
    }

    #[test]
    fn operator_cannot_decide() {
        let op = user(3, &["Operator"], Some(1));
        let mut adj = adjustment(1);
        let err = decide::<Adjustments>(&mut adj, Decision::Approve, &op, Utc::now()).unwrap_err();
        assert!(matches!(err, SpbuError::AuthorizationDenied { .. }));
        assert_eq!(adj.status(), ApprovalStatus::Pending);
    }

    #[test]
    fn admin_cannot_decide_for_another_station() {
        let admin = user(2, &["Admin"], Some(2));
        let mut adj = adjustment(1);
        assert!(decide::<Adjustments>(&mut adj, Decision::Approve, &admin, Utc::now()).is_err());

        let sa = user(4, &["Super Admin"], None);
        assert!(decide::<Adjustments>(&mut adj, Decision::Approve, &sa, Utc::now()).is_ok());
    }

    #[test]
    fn creation_rules_per_kind() {
        let op = user(1, &["Operator"], Some(1));
        let admin = user(2, &["Admin"], Some(1));
        let sa = user(3, &["Super Admin"], None);

        assert!(can_create::<Adjustments>(Some(&op)));
        assert!(!can_create::<Adjustments>(Some(&admin)));
        assert!(!can_create::<Adjustments>(Some(&sa)));

        assert!(can_create::<Deposits>(Some(&op)));
        assert!(can_create::<Deposits>(Some(&admin)));
        assert!(can_create::<Deliveries>(Some(&sa)));

        assert!(!can_create::<Deposits>(None));
        assert!(!can_decide::<Deliveries>(Some(&op)));
        assert!(can_decide::<Deliveries>(Some(&admin)));
    }

    #[test]
    fn confirmed_is_read_as_approved() {
        let status: ApprovalStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, ApprovalStatus::Approved);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"approved\"");
    }

    #[test]
    fn stock_effects() {
        let mut adj = adjustment(1);
        assert_eq!(
            adj.stock_effect(),
            Some(StockEffect {
                tank_id: 5,
                delta: 100.0
            })
        );
        adj.adjustment_type = AdjustmentType::Loss;
        assert_eq!(adj.stock_effect().unwrap().delta, -100.0);
        adj.target = AdjustmentTarget::Other;
        assert!(adj.stock_effect().is_none());
    }
}

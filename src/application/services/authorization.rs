//! # Caller Authorization
//!
//! Role-based authorization at the service boundary.
//!
//! The engine authorizes, it never authenticates: callers arrive with a
//! verified [`CallerContext`] and the service only decides whether that
//! identity may perform the requested operation. Buyers mutate their own
//! RFQs, suppliers act for their own company, admins act for the tenant.

use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::ids::SupplierId;
use crate::domain::value_objects::visibility::Visibility;
use crate::application::error::{ApplicationError, ApplicationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The caller's role within their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Creates and manages RFQs.
    Buyer,
    /// Submits quotes on behalf of a supplier company.
    Supplier,
    /// Tenant administrator; may perform any buyer operation.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buyer => "BUYER",
            Self::Supplier => "SUPPLIER",
            Self::Admin => "ADMIN",
        };
        write!(f, "{s}")
    }
}

/// Verified caller identity handed to every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// The individual user id; used as the audit-trail actor.
    pub caller_id: String,
    /// The caller's role.
    pub role: Role,
    /// The company the caller acts for (supplier id for suppliers).
    pub company_id: String,
}

impl CallerContext {
    /// Creates a buyer context.
    #[must_use]
    pub fn buyer(caller_id: impl Into<String>, company_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            role: Role::Buyer,
            company_id: company_id.into(),
        }
    }

    /// Creates a supplier context; `supplier_id` is the acting company.
    #[must_use]
    pub fn supplier(caller_id: impl Into<String>, supplier_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            role: Role::Supplier,
            company_id: supplier_id.into(),
        }
    }

    /// Creates an admin context.
    #[must_use]
    pub fn admin(caller_id: impl Into<String>, company_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            role: Role::Admin,
            company_id: company_id.into(),
        }
    }

    /// Authorizes a buyer-side mutation of `rfq`.
    ///
    /// Both roles are scoped to their own tenant: admins pass for any RFQ
    /// of their tenant, buyers only for RFQs they own.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Forbidden`] otherwise.
    pub fn authorize_buyer_of(&self, rfq: &Rfq) -> ApplicationResult<()> {
        match self.role {
            Role::Admin | Role::Buyer if rfq.tenant_id().as_str() != self.company_id => {
                Err(ApplicationError::Forbidden(format!(
                    "caller {} does not belong to tenant {}",
                    self.caller_id,
                    rfq.tenant_id()
                )))
            }
            Role::Admin => Ok(()),
            Role::Buyer if rfq.buyer_id().as_str() == self.caller_id => Ok(()),
            Role::Buyer => Err(ApplicationError::Forbidden(format!(
                "buyer {} does not own rfq {}",
                self.caller_id,
                rfq.number()
            ))),
            Role::Supplier => Err(ApplicationError::Forbidden(
                "suppliers cannot manage rfqs".to_owned(),
            )),
        }
    }

    /// Authorizes reading `rfq`.
    ///
    /// Buyers and admins read within their tenant. Suppliers read what the
    /// visibility rule shows them, plus any RFQ they already quoted on.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Forbidden`] otherwise.
    pub fn authorize_view_of(&self, rfq: &Rfq) -> ApplicationResult<()> {
        match self.role {
            Role::Admin | Role::Buyer => {
                if rfq.tenant_id().as_str() == self.company_id {
                    Ok(())
                } else {
                    Err(ApplicationError::Forbidden(format!(
                        "caller {} does not belong to tenant {}",
                        self.caller_id,
                        rfq.tenant_id()
                    )))
                }
            }
            Role::Supplier => {
                let supplier = SupplierId::new(self.company_id.clone());
                let visible = match rfq.visibility() {
                    Visibility::Public => true,
                    Visibility::Invited => rfq.invited_suppliers().contains(&supplier),
                    Visibility::Private => false,
                };
                let participated = rfq.quotes().iter().any(|q| q.supplier_id() == &supplier);
                if visible || participated {
                    Ok(())
                } else {
                    Err(ApplicationError::Forbidden(format!(
                        "supplier {supplier} may not view rfq {}",
                        rfq.number()
                    )))
                }
            }
        }
    }

    /// Authorizes a supplier-side operation, returning the acting supplier.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Forbidden`] for non-supplier roles.
    pub fn authorize_supplier(&self) -> ApplicationResult<SupplierId> {
        if self.role == Role::Supplier {
            Ok(SupplierId::new(self.company_id.clone()))
        } else {
            Err(ApplicationError::Forbidden(format!(
                "role {} cannot act as a supplier",
                self.role
            )))
        }
    }
}

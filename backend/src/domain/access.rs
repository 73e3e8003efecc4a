//! Role-based access policy.
//!
//! Handlers call [`authorize`] with the caller identity (if any) and the
//! action they are about to perform. Ownership checks for product updates
//! live in [`ensure_can_modify`].

use super::{AuthenticatedUser, Error, Product, Role};

/// Operations gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListProducts,
    ViewProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    ViewReports,
    Chat,
    UploadDocument,
}

impl Action {
    /// Whether the action can be performed without a token.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::ListProducts | Self::ViewProduct)
    }

    /// Roles allowed to perform the action once authenticated.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::CreateProduct | Self::UpdateProduct => &[Role::Admin, Role::Manager],
            Self::DeleteProduct => &[Role::Admin],
            Self::ListProducts
            | Self::ViewProduct
            | Self::ViewReports
            | Self::Chat
            | Self::UploadDocument => &[Role::Admin, Role::Manager, Role::Staff],
        }
    }

    /// Whether `role` may perform the action.
    #[must_use]
    pub fn permits(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Check `caller` against the policy for `action`.
///
/// Missing identity on a protected action yields `unauthorized`; a role
/// outside the allowed set yields `forbidden`.
///
/// # Examples
/// ```
/// use inventory::domain::{Action, AuthenticatedUser, ErrorCode, Role, UserId, authorize};
///
/// let staff = AuthenticatedUser::new(UserId::new(3).unwrap(), Role::Staff);
/// assert!(authorize(None, Action::ListProducts).is_ok());
/// let err = authorize(Some(&staff), Action::DeleteProduct).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn authorize(caller: Option<&AuthenticatedUser>, action: Action) -> Result<(), Error> {
    if action.is_public() {
        return Ok(());
    }
    let caller = caller.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    if action.permits(caller.role) {
        Ok(())
    } else {
        Err(Error::forbidden("forbidden: insufficient role"))
    }
}

/// Managers may only modify products they created; admins may modify any.
pub fn ensure_can_modify(caller: &AuthenticatedUser, product: &Product) -> Result<(), Error> {
    match caller.role {
        Role::Admin => Ok(()),
        Role::Manager if product.created_by == Some(caller.user_id) => Ok(()),
        Role::Manager => Err(Error::forbidden(
            "forbidden: managers may only modify their own products",
        )),
        Role::Staff => Err(Error::forbidden("forbidden: insufficient role")),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the access policy.
    use super::*;
    use crate::domain::{ErrorCode, NewProduct, ProductDraft, UserId};
    use rstest::rstest;

    fn caller(id: i32, role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).expect("valid id"), role)
    }

    fn product_owned_by(owner: Option<i32>) -> Product {
        let draft = ProductDraft {
            product_id: Some(1),
            product_name: Some("Widget".to_owned()),
            quantity: Some(1),
            price: Some(1.0),
            ..ProductDraft::default()
        };
        let new = NewProduct::try_from(draft).expect("valid product");
        Product::from_new(new, owner.map(|id| UserId::new(id).expect("valid id")))
    }

    #[rstest]
    #[case(Action::ListProducts)]
    #[case(Action::ViewProduct)]
    fn reads_are_public(#[case] action: Action) {
        assert!(authorize(None, action).is_ok());
    }

    #[rstest]
    #[case(Action::CreateProduct)]
    #[case(Action::DeleteProduct)]
    #[case(Action::ViewReports)]
    #[case(Action::Chat)]
    #[case(Action::UploadDocument)]
    fn protected_actions_require_identity(#[case] action: Action) {
        let err = authorize(None, action).expect_err("anonymous caller rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(Role::Admin, Action::DeleteProduct, true)]
    #[case(Role::Manager, Action::DeleteProduct, false)]
    #[case(Role::Staff, Action::DeleteProduct, false)]
    #[case(Role::Admin, Action::CreateProduct, true)]
    #[case(Role::Manager, Action::CreateProduct, true)]
    #[case(Role::Staff, Action::CreateProduct, false)]
    #[case(Role::Manager, Action::UpdateProduct, true)]
    #[case(Role::Staff, Action::UpdateProduct, false)]
    #[case(Role::Staff, Action::ViewReports, true)]
    #[case(Role::Staff, Action::Chat, true)]
    #[case(Role::Staff, Action::UploadDocument, true)]
    fn role_matrix(#[case] role: Role, #[case] action: Action, #[case] allowed: bool) {
        let result = authorize(Some(&caller(1, role)), action);
        match (allowed, result) {
            (true, Ok(())) => {}
            (false, Err(err)) => {
                assert_eq!(err.code(), ErrorCode::Forbidden);
                assert_eq!(err.message(), "forbidden: insufficient role");
            }
            (true, Err(err)) => panic!("expected access, got {err:?}"),
            (false, Ok(())) => panic!("expected rejection for {role} on {action:?}"),
        }
    }

    #[rstest]
    #[case(Role::Admin, Some(9), true)]
    #[case(Role::Admin, None, true)]
    #[case(Role::Manager, Some(4), true)]
    #[case(Role::Manager, Some(9), false)]
    #[case(Role::Manager, None, false)]
    #[case(Role::Staff, Some(4), false)]
    fn ownership_rules(#[case] role: Role, #[case] owner: Option<i32>, #[case] allowed: bool) {
        let result = ensure_can_modify(&caller(4, role), &product_owned_by(owner));
        assert_eq!(result.is_ok(), allowed);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }
}

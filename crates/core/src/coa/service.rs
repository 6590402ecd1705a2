//! Validation rules for creating and changing accounts.

use koperasi_shared::types::AccountId;

use crate::coa::error::CoaError;
use crate::coa::types::{Account, AccountCategory, NewAccount};

/// Longest accepted account code.
pub const MAX_CODE_LEN: usize = 20;
/// Longest accepted account name.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// What the rules need to know about a prospective parent account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentInfo {
    /// Parent account ID.
    pub id: AccountId,
    /// Parent account code.
    pub code: String,
    /// Whether the parent is active.
    pub is_active: bool,
}

/// A new account that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAccount {
    /// Normalized code.
    pub code: String,
    /// Normalized name.
    pub name: String,
    /// Category.
    pub category: AccountCategory,
    /// Resolved parent.
    pub parent_id: Option<AccountId>,
    /// Normalized description.
    pub description: Option<String>,
}

/// Stateless service holding the chart of accounts rules.
pub struct CoaService;

impl CoaService {
    /// Trims and checks an account code.
    ///
    /// Codes are 1 to 20 characters of ASCII letters, digits, `.` and `-`.
    pub fn normalize_code(code: &str) -> Result<String, CoaError> {
        let code = code.trim();
        let valid_chars = code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

        if code.is_empty() || code.len() > MAX_CODE_LEN || !valid_chars {
            return Err(CoaError::InvalidCode(code.to_string()));
        }
        Ok(code.to_string())
    }

    /// Trims and checks an account name.
    pub fn normalize_name(name: &str) -> Result<String, CoaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoaError::InvalidName("name is required".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CoaError::InvalidName(format!(
                "name exceeds {MAX_NAME_LEN} characters"
            )));
        }
        Ok(name.to_string())
    }

    /// Trims a description; blank becomes `None`.
    pub fn normalize_description(description: Option<&str>) -> Result<Option<String>, CoaError> {
        match description.map(str::trim) {
            None | Some("") => Ok(None),
            Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(CoaError::InvalidDescription(
                format!("description exceeds {MAX_DESCRIPTION_LEN} characters"),
            )),
            Some(d) => Ok(Some(d.to_string())),
        }
    }

    /// Resolves a parent reference.
    ///
    /// `parent` is the account found under `parent_code`, if any.
    pub fn validate_parent(
        parent_code: &str,
        parent: Option<&ParentInfo>,
    ) -> Result<AccountId, CoaError> {
        match parent {
            None => Err(CoaError::ParentNotFound(parent_code.to_string())),
            Some(p) if !p.is_active => Err(CoaError::ParentInactive(p.code.clone())),
            Some(p) => Ok(p.id),
        }
    }

    /// Validates a new account.
    ///
    /// # Arguments
    /// * `input` - The requested account
    /// * `code_taken` - Whether the normalized code is already used in the koperasi
    /// * `parent` - The account matching `input.parent_code`, if one was found
    pub fn validate_new(
        input: NewAccount,
        code_taken: bool,
        parent: Option<&ParentInfo>,
    ) -> Result<ValidatedAccount, CoaError> {
        let code = Self::normalize_code(&input.code)?;
        let name = Self::normalize_name(&input.name)?;
        let description = Self::normalize_description(input.description.as_deref())?;

        if code_taken {
            return Err(CoaError::DuplicateCode(code));
        }

        let parent_id = match input.parent_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(parent_code) => Some(Self::validate_parent(parent_code, parent)?),
        };

        Ok(ValidatedAccount {
            code,
            name,
            category: input.category,
            parent_id,
            description,
        })
    }

    /// Checks whether an account may move to `new_category`.
    ///
    /// Refused once any posted journal line references the account.
    pub fn check_category_change(
        account: &Account,
        new_category: AccountCategory,
        has_posted_lines: bool,
    ) -> Result<(), CoaError> {
        if new_category != account.category && has_posted_lines {
            return Err(CoaError::CategoryLocked(account.code.clone()));
        }
        Ok(())
    }

    /// Checks that placing `account` under `parent` keeps the hierarchy acyclic.
    ///
    /// `parent_ancestors` lists the parent's own ancestors, nearest first.
    pub fn check_reparent(
        account: &Account,
        parent: &ParentInfo,
        parent_ancestors: &[AccountId],
    ) -> Result<(), CoaError> {
        if parent.id == account.id || parent_ancestors.contains(&account.id) {
            return Err(CoaError::ParentCycle(account.code.clone()));
        }
        Ok(())
    }
}

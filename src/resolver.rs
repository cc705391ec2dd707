// Interface resolution: user token -> ifIndex, name, alias, speed, sysName.

use crate::mib;
use crate::models::{InterfaceIdentity, InterfaceInfo};
use crate::snmp::{self, Oid, SnmpError, SnmpTransport, Value};
use futures_util::TryStreamExt;
use std::pin::pin;
use thiserror::Error;

/// GetBulk max-repetitions used when walking ifName.
pub const DEFAULT_WALK_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("interface '{0}' not found")]
    NotFound(String),

    #[error("no interface with index {0}")]
    NoSuchInterface(u32),

    #[error("invalid interface index '{0}'")]
    InvalidIndex(String),

    #[error("interface {0} reports no usable ifHighSpeed")]
    MissingSpeed(u32),

    #[error(transparent)]
    Snmp(#[from] SnmpError),
}

/// How a user-supplied token names an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceToken<'a> {
    /// ".14": ifIndex 14 (digits kept as given).
    Index(&'a str),
    /// Anything else: case-insensitive substring of ifName.
    Name(&'a str),
}

impl<'a> InterfaceToken<'a> {
    pub fn parse(token: &'a str) -> Self {
        match token.strip_prefix('.') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                InterfaceToken::Index(digits)
            }
            _ => InterfaceToken::Name(token),
        }
    }
}

pub struct Resolver<'a, T: ?Sized> {
    transport: &'a T,
    walk_page_size: u32,
}

impl<'a, T: SnmpTransport + ?Sized> Resolver<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            walk_page_size: DEFAULT_WALK_PAGE_SIZE,
        }
    }

    pub fn with_walk_page_size(mut self, page_size: u32) -> Self {
        self.walk_page_size = page_size.max(1);
        self
    }

    /// Resolves `token` then fetches sysName, ifAlias and ifHighSpeed in one request.
    /// No retries; any failure is returned as-is.
    pub async fn resolve(&self, token: &str) -> Result<InterfaceInfo, ResolveError> {
        let (index, name) = match InterfaceToken::parse(token) {
            InterfaceToken::Index(digits) => {
                let index = digits
                    .parse::<u32>()
                    .ok()
                    .filter(|&i| i > 0)
                    .ok_or_else(|| ResolveError::InvalidIndex(token.to_string()))?;
                (index, self.name_at(index).await?)
            }
            InterfaceToken::Name(needle) => self.find_by_name(needle).await?,
        };
        tracing::debug!(index, name = %name, "interface index resolved");

        let sys_name_oid = mib::oid(mib::SYS_NAME_0);
        let alias_oid = mib::indexed(mib::IF_ALIAS, index);
        let speed_oid = mib::indexed(mib::IF_HIGH_SPEED, index);
        let response = self
            .transport
            .get(&[sys_name_oid.clone(), alias_oid.clone(), speed_oid.clone()])
            .await?;
        response.check()?;

        let speed_mbps = response
            .value_of(&speed_oid)
            .and_then(Value::as_counter)
            .ok_or(ResolveError::MissingSpeed(index))?;

        Ok(InterfaceInfo {
            identity: InterfaceIdentity {
                index,
                name,
                alias: text_or_empty(response.value_of(&alias_oid)),
                speed_mbps,
            },
            sys_name: text_or_empty(response.value_of(&sys_name_oid)),
        })
    }

    async fn name_at(&self, index: u32) -> Result<String, ResolveError> {
        let oid = mib::indexed(mib::IF_NAME, index);
        let response = self.transport.get(std::slice::from_ref(&oid)).await?;
        response.check()?;
        match response.value_of(&oid) {
            Some(value) if !value.is_exception() => Ok(value.to_text()),
            _ => Err(ResolveError::NoSuchInterface(index)),
        }
    }

    /// First ifName (in walk order) containing `needle`, ignoring case.
    async fn find_by_name(&self, needle: &str) -> Result<(u32, String), ResolveError> {
        let base = mib::oid(mib::IF_NAME);
        let needle_upper = needle.to_uppercase();
        let mut walk = pin!(snmp::bulk_walk(
            self.transport,
            base.clone(),
            self.walk_page_size
        ));

        while let Some(vb) = walk.try_next().await? {
            let name = vb.value.to_text();
            if !name.to_uppercase().contains(&needle_upper) {
                continue;
            }
            if let Some(&index) = row_index(&vb.oid, &base) {
                return Ok((index, name));
            }
        }
        Err(ResolveError::NotFound(needle.to_string()))
    }
}

fn row_index<'o>(oid: &'o Oid, column: &Oid) -> Option<&'o u32> {
    oid.suffix_after(column).and_then(|suffix| suffix.first())
}

fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(v) if !v.is_exception() => v.to_text(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_numeric_suffix_form() {
        assert_eq!(InterfaceToken::parse(".14"), InterfaceToken::Index("14"));
        assert_eq!(InterfaceToken::parse(".0"), InterfaceToken::Index("0"));
    }

    #[test]
    fn test_token_substring_form() {
        assert_eq!(InterfaceToken::parse("Gi0/1"), InterfaceToken::Name("Gi0/1"));
        assert_eq!(InterfaceToken::parse("."), InterfaceToken::Name("."));
        assert_eq!(InterfaceToken::parse(".1a"), InterfaceToken::Name(".1a"));
        assert_eq!(InterfaceToken::parse("ge-0/0/0.14"), InterfaceToken::Name("ge-0/0/0.14"));
    }
}

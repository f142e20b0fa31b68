use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, OnceLock},
};

use crate::{
    error::tz::Error as E,
    tz::{offset, DateTimeZone},
    Error,
};

/// A source of time zones by identifier.
///
/// A provider must support `"UTC"`, and must resolve it to
/// [`DateTimeZone::UTC`].
pub trait ZoneProvider: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the zone with the given identifier, if this provider knows
    /// it.
    fn zone(&self, id: &str) -> Option<DateTimeZone>;

    /// Returns every identifier this provider can resolve.
    fn available_ids(&self) -> BTreeSet<String>;
}

/// A provider that only knows about UTC.
#[derive(Clone, Debug, Default)]
pub struct UtcProvider(());

impl UtcProvider {
    /// Creates a new UTC-only provider.
    pub fn new() -> UtcProvider {
        UtcProvider(())
    }
}

impl ZoneProvider for UtcProvider {
    fn zone(&self, id: &str) -> Option<DateTimeZone> {
        if id == "UTC" {
            Some(DateTimeZone::UTC)
        } else {
            None
        }
    }

    fn available_ids(&self) -> BTreeSet<String> {
        BTreeSet::from(["UTC".to_string()])
    }
}

/// A provider backed by an in-memory map of zones.
///
/// It always contains UTC.
///
/// # Example
///
/// ```
/// use chronology::tz::{DateTimeZone, MemoryProvider, ZoneProvider};
///
/// let est = DateTimeZone::fixed_named("EST", -18_000_000, -18_000_000)?;
/// let provider = MemoryProvider::new().with_zone(est.clone());
/// assert_eq!(provider.zone("EST"), Some(est));
/// assert_eq!(provider.available_ids().len(), 2);
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct MemoryProvider {
    zones: BTreeMap<String, DateTimeZone>,
}

impl MemoryProvider {
    /// Creates a provider containing only UTC.
    pub fn new() -> MemoryProvider {
        let mut zones = BTreeMap::new();
        zones.insert("UTC".to_string(), DateTimeZone::UTC);
        MemoryProvider { zones }
    }

    /// Adds a zone under its own identifier, replacing any zone already
    /// registered under it.
    pub fn with_zone(mut self, zone: DateTimeZone) -> MemoryProvider {
        self.zones.insert(zone.id().to_string(), zone);
        self
    }
}

impl Default for MemoryProvider {
    fn default() -> MemoryProvider {
        MemoryProvider::new()
    }
}

impl ZoneProvider for MemoryProvider {
    fn zone(&self, id: &str) -> Option<DateTimeZone> {
        self.zones.get(id).cloned()
    }

    fn available_ids(&self) -> BTreeSet<String> {
        self.zones.keys().cloned().collect()
    }
}

/// The configuration used to resolve zone identifiers.
///
/// A context pairs a validated [`ZoneProvider`] with a default zone. There
/// is one process wide context, available through [`ZoneContext::global`],
/// which may be replaced once at startup with [`ZoneContext::install`].
/// Contexts can also be created and passed around explicitly.
///
/// # Example
///
/// ```
/// use chronology::tz::{DateTimeZone, MemoryProvider, ZoneContext};
///
/// let est = DateTimeZone::fixed_named("EST", -18_000_000, -18_000_000)?;
/// let ctx = ZoneContext::new(MemoryProvider::new().with_zone(est.clone()))?
///     .with_default_zone(est.clone());
/// assert_eq!(ctx.for_id("EST")?, est);
/// assert_eq!(ctx.for_id("+01:30")?.offset(0), 5_400_000);
/// assert_eq!(ctx.default_zone(), &est);
/// assert!(ctx.for_id("Mars/Olympus_Mons").is_err());
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ZoneContext {
    provider: Arc<dyn ZoneProvider>,
    default_zone: DateTimeZone,
}

static GLOBAL: OnceLock<ZoneContext> = OnceLock::new();

impl ZoneContext {
    /// Creates a context after validating the provider.
    ///
    /// The provider must list at least one identifier, must list `"UTC"`,
    /// and must resolve `"UTC"` to [`DateTimeZone::UTC`]. The default zone
    /// is UTC.
    pub fn new(provider: impl ZoneProvider) -> Result<ZoneContext, Error> {
        let ids = provider.available_ids();
        if ids.is_empty() {
            return Err(E::ProviderEmpty.into());
        }
        if !ids.contains("UTC") {
            return Err(E::ProviderMissingUtc.into());
        }
        if provider.zone("UTC") != Some(DateTimeZone::UTC) {
            return Err(E::ProviderInvalidUtc.into());
        }
        trace!("validated zone provider with {} zone ids", ids.len());
        Ok(ZoneContext {
            provider: Arc::new(provider),
            default_zone: DateTimeZone::UTC,
        })
    }

    /// Returns this context with a different default zone.
    pub fn with_default_zone(self, zone: DateTimeZone) -> ZoneContext {
        ZoneContext { default_zone: zone, ..self }
    }

    /// Returns the default zone.
    pub fn default_zone(&self) -> &DateTimeZone {
        &self.default_zone
    }

    /// Returns every identifier the provider can resolve.
    pub fn available_ids(&self) -> BTreeSet<String> {
        self.provider.available_ids()
    }

    /// Resolves a zone identifier.
    ///
    /// `"UTC"` always resolves. Otherwise the provider is asked, and
    /// identifiers starting with a sign are parsed as fixed offsets like
    /// `"+05:30"`.
    pub fn for_id(&self, id: &str) -> Result<DateTimeZone, Error> {
        if id == "UTC" {
            return Ok(DateTimeZone::UTC);
        }
        if let Some(zone) = self.provider.zone(id) {
            return Ok(zone);
        }
        if id.starts_with(['+', '-']) {
            return DateTimeZone::fixed(offset::parse_offset(id)?);
        }
        Err(E::UnknownId { id: id.into() }.into())
    }

    /// Returns the process wide context.
    ///
    /// Unless one was installed first, this is a UTC-only context with a
    /// UTC default zone.
    pub fn global() -> &'static ZoneContext {
        GLOBAL.get_or_init(|| {
            debug!("initializing global zone context with UTC provider");
            ZoneContext {
                provider: Arc::new(UtcProvider::new()),
                default_zone: DateTimeZone::UTC,
            }
        })
    }

    /// Installs `ctx` as the process wide context.
    ///
    /// This fails when the global context was already installed or already
    /// used.
    pub fn install(ctx: ZoneContext) -> Result<(), Error> {
        GLOBAL.set(ctx).map_err(|_| {
            warn!("global zone context was already initialized");
            Error::from(E::GlobalAlreadyInstalled)
        })?;
        debug!(
            "installed global zone context with {} zone ids",
            ZoneContext::global().available_ids().len(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Broken {
        ids: &'static [&'static str],
        utc: Option<DateTimeZone>,
    }

    impl ZoneProvider for Broken {
        fn zone(&self, _: &str) -> Option<DateTimeZone> {
            self.utc.clone()
        }

        fn available_ids(&self) -> BTreeSet<String> {
            self.ids.iter().map(|id| id.to_string()).collect()
        }
    }

    #[test]
    fn provider_validation() {
        let err = ZoneContext::new(Broken { ids: &[], utc: None }).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"zone provider does not list any time zone ids",
        );
        let err = ZoneContext::new(Broken { ids: &["EST"], utc: None })
            .unwrap_err();
        insta::assert_snapshot!(err, @r###"zone provider does not support "UTC""###);
        let fake = DateTimeZone::fixed_named("UTC", 0, 0).unwrap();
        let err = ZoneContext::new(Broken { ids: &["UTC"], utc: Some(fake) })
            .unwrap_err();
        insta::assert_snapshot!(
            err,
            @r###"zone provider resolves "UTC" to a non-canonical zone"###,
        );
        assert!(ZoneContext::new(UtcProvider::new()).is_ok());
    }

    #[test]
    fn lookups() {
        let ctx = ZoneContext::new(MemoryProvider::new()).unwrap();
        assert_eq!(ctx.for_id("UTC").unwrap(), DateTimeZone::UTC);
        assert_eq!(ctx.for_id("+00:00").unwrap(), DateTimeZone::UTC);
        assert_eq!(ctx.for_id("-02:30").unwrap().id(), "-02:30");
        assert!(ctx.for_id("+25:00").is_err());
        let err = ctx.for_id("Europe/Nowhere").unwrap_err();
        insta::assert_snapshot!(
            err,
            @r###"the time zone id "Europe/Nowhere" is not recognised"###,
        );
        assert_eq!(ctx.available_ids().len(), 1);
    }

    #[test]
    fn global_defaults_to_utc() {
        let ctx = ZoneContext::global();
        assert!(ctx.default_zone().is_utc());
        assert_eq!(ctx.for_id("UTC").unwrap(), DateTimeZone::UTC);
        assert!(ZoneContext::install(ctx.clone()).is_err());
    }
}

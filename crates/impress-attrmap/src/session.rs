//! Per-session registry bundle

use std::rc::Rc;

use impress_identifiers::Site;
use tracing::debug;

use crate::codec::{standard_decoders, standard_encoders, Decoder, Encoder};
use crate::error::Result;
use crate::factory::{standard_factories, Factory, MappedFactory};
use crate::mode::Mode;
use crate::registry::{Registry, Shared};

/// Which of the four registries an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    Factory,
    Encoder,
    Decoder,
    Mode,
}

impl RegistryKind {
    pub const ALL: [RegistryKind; 4] = [
        RegistryKind::Factory,
        RegistryKind::Encoder,
        RegistryKind::Decoder,
        RegistryKind::Mode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Factory => "factory",
            RegistryKind::Encoder => "encoder",
            RegistryKind::Decoder => "decoder",
            RegistryKind::Mode => "mode",
        }
    }
}

/// The factory, encoder, decoder and mode registries of one session.
///
/// Cloning shares the registries; it does not copy them.
#[derive(Debug, Clone)]
pub struct Registries {
    pub factory: Shared<Rc<dyn Factory>>,
    pub encoder: Shared<Rc<dyn Encoder>>,
    pub decoder: Shared<Rc<dyn Decoder>>,
    pub mode: Shared<Mode>,
}

impl Registries {
    /// Standard entries with `loose`, `v3`, `v3` and `short` selected.
    pub fn standard() -> Self {
        let mut factory = Registry::new("factory");
        factory.update(standard_factories());
        let mut encoder = Registry::new("encoder");
        encoder.update(standard_encoders());
        let mut decoder = Registry::new("decoder");
        decoder.update(standard_decoders());
        let mut mode = Registry::new("mode");
        mode.update(Mode::ALL.iter().map(|m| (m.as_str(), *m)));

        let registries = Self {
            factory: factory.shared(),
            encoder: encoder.shared(),
            decoder: decoder.shared(),
            mode: mode.shared(),
        };
        registries.set_standard_defaults();
        registries
    }

    fn set_standard_defaults(&self) {
        for (kind, name) in [
            (RegistryKind::Factory, "loose"),
            (RegistryKind::Encoder, "v3"),
            (RegistryKind::Decoder, "v3"),
            (RegistryKind::Mode, "short"),
        ] {
            if let Err(e) = self.select(kind, name) {
                debug!("standard {} default: {}", kind.as_str(), e);
            }
        }
    }

    /// Make `name` the default of one registry.
    pub fn select(&self, kind: RegistryKind, name: &str) -> Result<()> {
        match kind {
            RegistryKind::Factory => self.factory.borrow_mut().set_default(name).map(|_| ()),
            RegistryKind::Encoder => self.encoder.borrow_mut().set_default(name).map(|_| ()),
            RegistryKind::Decoder => self.decoder.borrow_mut().set_default(name).map(|_| ()),
            RegistryKind::Mode => self.mode.borrow_mut().set_default(name).map(|_| ()),
        }
    }

    /// Entry names of one registry, in registration order.
    pub fn keys(&self, kind: RegistryKind) -> Vec<String> {
        fn names<T: Clone>(r: &Shared<T>) -> Vec<String> {
            r.borrow().keys().map(str::to_string).collect()
        }
        match kind {
            RegistryKind::Factory => names(&self.factory),
            RegistryKind::Encoder => names(&self.encoder),
            RegistryKind::Decoder => names(&self.decoder),
            RegistryKind::Mode => names(&self.mode),
        }
    }

    pub fn contains(&self, kind: RegistryKind, name: &str) -> bool {
        match kind {
            RegistryKind::Factory => self.factory.borrow().contains(name),
            RegistryKind::Encoder => self.encoder.borrow().contains(name),
            RegistryKind::Decoder => self.decoder.borrow().contains(name),
            RegistryKind::Mode => self.mode.borrow().contains(name),
        }
    }

    /// Give configured sites a value kind in the typed factories.
    pub fn configure_sites<I>(&self, sites: I)
    where
        I: IntoIterator<Item = (String, Site)>,
    {
        let mut loose = MappedFactory::loose();
        let mut strict = MappedFactory::strict();
        for (key, site) in sites {
            debug!("site {} -> {}", key, site.host);
            loose.add_site(key.clone(), site.clone());
            strict.add_site(key, site);
        }
        let loose: Rc<dyn Factory> = Rc::new(loose);
        let strict: Rc<dyn Factory> = Rc::new(strict);
        self.factory
            .borrow_mut()
            .insert("typed", Rc::clone(&loose))
            .insert("loose", loose)
            .insert("strict", strict);
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::standard()
    }
}

use super::handler::{ChannelHandler, TotHandler};
use super::parser::{check_header, decode_into, read_utc_time};
use super::section::PsiSection;
use super::types::*;
use crate::config::Config;
use crate::error::{Result, SiError};
use log::{debug, error, trace};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Registry key: a table_id together with its table_id_extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubtableId {
    /// Table identifier.
    pub table_id: u8,
    /// table_id_extension, 0 for short-form tables.
    pub extension: u16,
}

impl SubtableId {
    /// Creates a key.
    pub fn new(table_id: u8, extension: u16) -> Self {
        Self {
            table_id,
            extension,
        }
    }
}

impl fmt::Display for SubtableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table_id == 0x{:02x}, extension == 0x{:02x}",
            self.table_id, self.extension
        )
    }
}

/// A per-subtable decoder fed by the [`Demux`].
pub trait SubtableDecoder {
    /// Takes ownership of one complete section routed to this decoder.
    fn gather(&mut self, section: PsiSection);

    /// Flags that the stream feeding this decoder was interrupted.
    fn mark_discontinuity(&mut self);
}

/// Routes reassembled sections to the decoders attached for their subtable.
///
/// Attach, detach and dispatch all take `&mut self`, so a decoder can never
/// be detached while it is handling a section.
#[derive(Default)]
pub struct Demux {
    subdecoders: HashMap<SubtableId, Box<dyn SubtableDecoder>>,
    config: Config,
}

impl Demux {
    /// Creates an empty demultiplexer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty demultiplexer with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            subdecoders: HashMap::new(),
            config,
        }
    }

    /// Registers `decoder` for `id`. Fails if the slot is already taken,
    /// leaving the registry unchanged.
    pub fn attach(&mut self, id: SubtableId, decoder: Box<dyn SubtableDecoder>) -> Result<()> {
        if self.subdecoders.contains_key(&id) {
            return Err(SiError::AlreadyRegistered {
                table_id: id.table_id,
                extension: id.extension,
            });
        }
        self.subdecoders.try_reserve(1)?;
        self.subdecoders.insert(id, decoder);
        Ok(())
    }

    /// Removes and returns the decoder registered for `id`.
    pub fn detach(&mut self, id: SubtableId) -> Result<Box<dyn SubtableDecoder>> {
        self.subdecoders.remove(&id).ok_or(SiError::NotFound {
            table_id: id.table_id,
            extension: id.extension,
        })
    }

    /// Looks up the decoder registered for a subtable.
    pub fn get_subdecoder(&self, table_id: u8, extension: u16) -> Option<&dyn SubtableDecoder> {
        self.subdecoders
            .get(&SubtableId::new(table_id, extension))
            .map(|decoder| &**decoder)
    }

    /// Returns true if a decoder is registered for the subtable.
    pub fn is_attached(&self, table_id: u8, extension: u16) -> bool {
        self.subdecoders
            .contains_key(&SubtableId::new(table_id, extension))
    }

    /// Number of registered decoders.
    pub fn len(&self) -> usize {
        self.subdecoders.len()
    }

    /// Returns true if no decoder is registered.
    pub fn is_empty(&self) -> bool {
        self.subdecoders.is_empty()
    }

    /// Hands a complete section to the decoder registered for its subtable.
    /// Sections nobody listens for are dropped.
    pub fn push_section(&mut self, section: PsiSection) {
        if self.config.trace_sections {
            trace!(target: "demux", "section {:02x?}", section.data());
        }

        let id = SubtableId::new(section.table_id, section.extension);
        match self.subdecoders.get_mut(&id) {
            Some(decoder) => decoder.gather(section),
            None => debug!(target: "demux", "no decoder for ({}), dropping section", id),
        }
    }

    /// Parses `data` as a complete section and dispatches it.
    pub fn push_bytes(&mut self, data: impl Into<bytes::Bytes>) -> Result<()> {
        let section = PsiSection::parse(data)?;
        self.push_section(section);
        Ok(())
    }

    /// Flags a discontinuity on every registered decoder.
    pub fn mark_discontinuity(&mut self) {
        for decoder in self.subdecoders.values_mut() {
            decoder.mark_discontinuity();
        }
    }
}

impl fmt::Debug for Demux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Demux")
            .field("subdecoders", &self.subdecoders.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

/// TDT/TOT subtable decoder.
///
/// TDT and TOT always fit in a single section, so there is nothing to
/// reassemble and the discontinuity flag has no effect beyond being cleared.
pub struct TotDecoder {
    handler: Box<dyn TotHandler>,
    discontinuity: bool,
}

impl TotDecoder {
    /// Creates a decoder delivering to `handler`.
    pub fn new(handler: Box<dyn TotHandler>) -> Self {
        Self {
            handler,
            discontinuity: false,
        }
    }

    /// Returns true if a discontinuity was flagged and not yet cleared.
    pub fn discontinuity(&self) -> bool {
        self.discontinuity
    }
}

impl SubtableDecoder for TotDecoder {
    fn gather(&mut self, section: PsiSection) {
        debug!(target: "TDT/TOT decoder", "got a section");

        if let Err(e) = check_header(&section) {
            error!(target: "TDT/TOT decoder", "dropping section: {}", e);
            return;
        }

        // Single-section table, nothing to resynchronise
        self.discontinuity = false;

        let mut tot = Tot::new(read_utc_time(&section).unwrap_or(0));
        if let Err(e) = decode_into(&mut tot, &section) {
            error!(target: "TDT/TOT decoder", "failed decoding section: {}", e);
            return;
        }
        drop(section);

        self.handler.on_tot(tot);
    }

    fn mark_discontinuity(&mut self) {
        self.discontinuity = true;
    }
}

fn tot_subtable_id(table_id: u8) -> Result<SubtableId> {
    if TableKind::from_table_id(table_id).is_none() {
        return Err(SiError::InvalidTableId(table_id));
    }
    // The extension is meaningless for TDT/TOT and always keyed as 0
    Ok(SubtableId::new(table_id, 0))
}

/// Attaches a TDT/TOT decoder for `table_id` (0x70 or 0x73).
///
/// The extension argument is ignored and forced to 0.
pub fn attach_tot<H>(demux: &mut Demux, table_id: u8, _extension: u16, handler: H) -> Result<()>
where
    H: TotHandler + 'static,
{
    let id = tot_subtable_id(table_id)?;
    let decoder = TotDecoder::new(Box::new(handler));
    if let Err(e) = demux.attach(id, Box::new(decoder)) {
        error!(target: "TDT/TOT decoder", "{}", e);
        return Err(e);
    }
    Ok(())
}

/// Attaches a TDT/TOT decoder whose tables are delivered over a channel.
pub fn attach_tot_channel(
    demux: &mut Demux,
    table_id: u8,
    extension: u16,
) -> Result<UnboundedReceiver<Tot>> {
    let (tx, rx) = mpsc::unbounded_channel();
    attach_tot(demux, table_id, extension, ChannelHandler::new(tx))?;
    Ok(rx)
}

/// Detaches the TDT/TOT decoder for `table_id`, dropping its handler.
///
/// The extension argument is ignored and forced to 0.
pub fn detach_tot(demux: &mut Demux, table_id: u8, _extension: u16) -> Result<()> {
    let id = SubtableId::new(table_id, 0);
    match demux.detach(id) {
        Ok(_decoder) => Ok(()),
        Err(e) => {
            error!(target: "TDT/TOT decoder", "{}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psi::handler::TotCollector;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tdt_section(utc: [u8; 5]) -> PsiSection {
        let mut data = vec![TABLE_ID_TDT, 0x30, 0x05];
        data.extend_from_slice(&utc);
        PsiSection::parse(data).unwrap()
    }

    #[test]
    fn test_attach_and_dispatch() {
        let mut demux = Demux::new();
        let collector = TotCollector::new();
        attach_tot(&mut demux, TABLE_ID_TDT, 0, collector.clone()).unwrap();
        assert!(demux.is_attached(TABLE_ID_TDT, 0));

        demux.push_section(tdt_section([0xC0, 0x79, 0x12, 0x34, 0x56]));
        let tables = collector.take();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].utc_time(), 0xC0_7912_3456);
    }

    #[test]
    fn test_extension_is_forced_to_zero() {
        let mut demux = Demux::new();
        attach_tot(&mut demux, TABLE_ID_TOT, 0xBEEF, |_tot: Tot| {}).unwrap();
        assert!(demux.is_attached(TABLE_ID_TOT, 0));
        assert!(!demux.is_attached(TABLE_ID_TOT, 0xBEEF));

        detach_tot(&mut demux, TABLE_ID_TOT, 0x1234).unwrap();
        assert!(demux.is_empty());
    }

    #[test]
    fn test_second_attach_keeps_original() {
        let mut demux = Demux::new();
        let first = TotCollector::new();
        let second = TotCollector::new();

        attach_tot(&mut demux, TABLE_ID_TDT, 0, first.clone()).unwrap();
        let err = attach_tot(&mut demux, TABLE_ID_TDT, 0, second.clone()).unwrap_err();
        assert!(matches!(
            err,
            SiError::AlreadyRegistered {
                table_id: TABLE_ID_TDT,
                extension: 0
            }
        ));
        assert_eq!(demux.len(), 1);

        demux.push_section(tdt_section([0; 5]));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_attach_rejects_foreign_table_id() {
        let mut demux = Demux::new();
        let err = attach_tot(&mut demux, 0x42, 0, |_tot: Tot| {}).unwrap_err();
        assert!(matches!(err, SiError::InvalidTableId(0x42)));
        assert!(demux.is_empty());
    }

    #[test]
    fn test_detach_unknown() {
        let mut demux = Demux::new();
        let err = detach_tot(&mut demux, TABLE_ID_TOT, 0).unwrap_err();
        assert!(matches!(err, SiError::NotFound { table_id: TABLE_ID_TOT, .. }));
    }

    #[test]
    fn test_detach_releases_handler() {
        let mut demux = Demux::new();
        let marker = Rc::new(());
        let held = Rc::clone(&marker);
        attach_tot(&mut demux, TABLE_ID_TDT, 0, move |_tot: Tot| {
            let _ = &held;
        })
        .unwrap();
        assert_eq!(Rc::strong_count(&marker), 2);

        detach_tot(&mut demux, TABLE_ID_TDT, 0).unwrap();
        assert_eq!(Rc::strong_count(&marker), 1);

        // The slot is free again
        attach_tot(&mut demux, TABLE_ID_TDT, 0, |_tot: Tot| {}).unwrap();
    }

    #[test]
    fn test_syntax_indicator_rejected_by_decoder() {
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let mut decoder = TotDecoder::new(Box::new(move |_tot: Tot| *counter.borrow_mut() += 1));

        let section = PsiSection::parse(vec![TABLE_ID_TDT, 0xB0, 0x05, 0, 0, 0, 0, 0]).unwrap();
        decoder.gather(section);
        assert_eq!(*seen.borrow(), 0);

        decoder.gather(tdt_section([0; 5]));
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_foreign_table_id_rejected_by_decoder() {
        let collector = TotCollector::new();
        let mut decoder = TotDecoder::new(Box::new(collector.clone()));
        let section = PsiSection::parse(vec![0x72, 0x30, 0x05, 0, 0, 0, 0, 0]).unwrap();
        decoder.gather(section);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_discontinuity_is_cleared_on_gather() {
        let mut decoder = TotDecoder::new(Box::new(|_tot: Tot| {}));
        decoder.mark_discontinuity();
        assert!(decoder.discontinuity());
        decoder.gather(tdt_section([0; 5]));
        assert!(!decoder.discontinuity());
    }

    #[test]
    fn test_unrouted_section_is_dropped() {
        let mut demux = Demux::with_config(Config::default().with_trace_sections(true));
        let collector = TotCollector::new();
        attach_tot(&mut demux, TABLE_ID_TOT, 0, collector.clone()).unwrap();
        demux.push_section(tdt_section([0; 5]));
        assert!(collector.is_empty());
        assert!(demux.get_subdecoder(TABLE_ID_TDT, 0).is_none());
        assert!(demux.get_subdecoder(TABLE_ID_TOT, 0).is_some());
    }

    #[test]
    fn test_channel_handoff() {
        let mut demux = Demux::new();
        let mut rx = attach_tot_channel(&mut demux, TABLE_ID_TDT, 0).unwrap();
        demux.push_bytes(vec![TABLE_ID_TDT, 0x30, 0x05, 1, 2, 3, 4, 5]).unwrap();

        let tot = rx.try_recv().unwrap();
        assert_eq!(tot.utc_time(), 0x0102030405);
        assert!(rx.try_recv().is_err());
    }
}

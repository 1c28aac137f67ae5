//! Fluent builder for constructing a [`Pipeline`].

use sdp_output::OutputWriter;
use sdp_vendor::{HereAdapter, MultiNetAdapter, RowSource, VendorAdapter};

use crate::context::PipelineContext;
use crate::{Pipeline, PipelineConfig, PipelineError, PipelineResult, Vendor};

/// Fluent builder for [`Pipeline<W>`].
///
/// # Required inputs
///
/// - [`PipelineConfig`]: vendor, traffic modes, time zone, …
/// - `W: OutputWriter`: where the tables go (CSV, SQLite, Parquet, memory)
/// - an input, either `.source(s)` or `.adapter(a)`
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.spatial_order(b)`    | `true`                           |
///
/// # Example
///
/// ```rust,ignore
/// let mut pipeline = PipelineBuilder::new(PipelineConfig::here(), CsvWriter::new(out)?)
///     .source(CsvSource::from_dir(input))
///     .build()?;
/// pipeline.run(&mut NoopObserver, &mut LogDiagnostics::new())?;
/// ```
pub struct PipelineBuilder<W: OutputWriter> {
    config:        PipelineConfig,
    writer:        W,
    input:         Option<Input>,
    spatial_order: bool,
}

enum Input {
    /// Adapter chosen from `config.vendor` at build time.
    Source(Box<dyn FnOnce(&PipelineConfig, bool) -> Box<dyn VendorAdapter>>),
    Adapter(Box<dyn VendorAdapter>),
}

impl<W: OutputWriter> PipelineBuilder<W> {
    pub fn new(config: PipelineConfig, writer: W) -> Self {
        Self { config, writer, input: None, spatial_order: true }
    }

    /// Read vendor tables from `source` with the adapter `config.vendor`
    /// names.
    pub fn source<S: RowSource + 'static>(mut self, source: S) -> Self {
        self.input = Some(Input::Source(Box::new(move |config: &PipelineConfig, spatial: bool| {
            vendor_adapter(config, spatial, source)
        })));
        self
    }

    /// Use a ready adapter.  `config.vendor` and the vendor options are not
    /// applied to it.
    pub fn adapter(mut self, adapter: Box<dyn VendorAdapter>) -> Self {
        self.input = Some(Input::Adapter(adapter));
        self
    }

    /// Order edges along a space-filling curve (default) or keep input
    /// order.  Only applies to adapters built from `.source(s)`.
    pub fn spatial_order(mut self, on: bool) -> Self {
        self.spatial_order = on;
        self
    }

    /// Validate the configuration and return a ready-to-run [`Pipeline`].
    pub fn build(self) -> PipelineResult<Pipeline<W>> {
        self.config.validate()?;
        let adapter = match self.input {
            Some(Input::Source(make)) => make(&self.config, self.spatial_order),
            Some(Input::Adapter(a)) => a,
            None => return Err(PipelineError::Config("no input source or adapter given".to_string())),
        };
        log::debug!("pipeline built for {} input", adapter.name());
        Ok(Pipeline {
            config: self.config,
            adapter,
            writer: self.writer,
            context: PipelineContext::new(),
            finished: false,
        })
    }
}

fn vendor_adapter<S: RowSource + 'static>(config: &PipelineConfig, spatial: bool, source: S) -> Box<dyn VendorAdapter> {
    match config.vendor {
        Vendor::Here => Box::new(
            HereAdapter::new(source)
                .transport_fields(config.transport_fields)
                .chunk_size(config.chunk_size)
                .spatial_order(spatial),
        ),
        Vendor::MultiNet => Box::new(
            MultiNetAdapter::new(source)
                .logistics(config.logistics)
                .spatial_order(spatial),
        ),
    }
}

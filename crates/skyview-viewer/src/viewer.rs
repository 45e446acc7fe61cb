//! Overlay-aware HiPS viewer

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use skyview_core::{
    CoordinateFrame, Marker, OverlayKind, OverlayOptions, OverlayPayload, Region, RegionInfo,
    S_REGION_COLUMN, SkyCoord, SourceTable, TableShape, ViewerCommand, ViewportResult,
    ViewportState, ViewportUpdate,
};
use skyview_widget::{SharedHipsWidget, aid};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::overlay::{
    NameCollision, OverlayError, OverlayInfo, OverlayRecord, OverlayRegistry, OverlayResult,
    OverlayTargets,
};

/// A non-fatal condition surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerWarning {
    /// The requested overlay name was taken and a suffixed one was used
    NameCollision(NameCollision),
    /// A delayed add ran after the first render and failed
    DelayedAddFailed {
        operation: &'static str,
        message: String,
    },
}

impl fmt::Display for ViewerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerWarning::NameCollision(collision) => fmt::Display::fmt(collision, f),
            ViewerWarning::DelayedAddFailed { operation, message } => {
                write!(f, "Delayed {operation} failed: {message}")
            }
        }
    }
}

/// A HiPS viewer owning the registry of its overlay layers
pub struct SkyViewer {
    widget: SharedHipsWidget,
    overlays: OverlayRegistry,
    warnings: Vec<ViewerWarning>,
    config: ViewerConfig,
}

/// Shared handle used by delayed adds and the frontend
pub type SharedSkyViewer = Arc<Mutex<SkyViewer>>;

/// Wrap a viewer in a shared handle
pub fn create_shared_viewer(viewer: SkyViewer) -> SharedSkyViewer {
    Arc::new(Mutex::new(viewer))
}

impl SkyViewer {
    pub fn new(widget: SharedHipsWidget) -> Self {
        Self::with_config(widget, ViewerConfig::default())
    }

    pub fn with_config(widget: SharedHipsWidget, config: ViewerConfig) -> Self {
        info!("Created sky viewer for widget {}", widget.id());
        Self {
            widget,
            overlays: OverlayRegistry::new(),
            warnings: Vec::new(),
            config,
        }
    }

    pub fn widget(&self) -> &SharedHipsWidget {
        &self.widget
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn overlay(&self, name: &str) -> Option<&OverlayRecord> {
        self.overlays.get(name)
    }

    /// Warnings raised since the last call, oldest first
    pub fn take_warnings(&mut self) -> Vec<ViewerWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[ViewerWarning] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: ViewerWarning) {
        self.warnings.push(warning);
    }

    /// Ask the host to display the widget
    pub fn display(&self) {
        self.widget.display();
    }

    pub fn set_viewport(&self, update: &ViewportUpdate) -> ViewportResult<()> {
        aid::set_viewport(self.widget.as_ref(), update)
    }

    pub fn get_viewport(&self, frame: Option<CoordinateFrame>) -> ViewportResult<ViewportState> {
        aid::get_viewport(self.widget.as_ref(), frame, None)
    }

    fn resolve_name(&mut self, options: OverlayOptions, default_name: &str) -> OverlayOptions {
        let (options, collision) = self.overlays.common_overlay_handling(options, default_name);
        if let Some(collision) = collision {
            self.warnings.push(ViewerWarning::NameCollision(collision));
        }
        options
    }

    fn register(
        &mut self,
        kind: OverlayKind,
        options: &OverlayOptions,
        payload: OverlayPayload,
    ) -> OverlayResult<OverlayRecord> {
        self.overlays
            .add_overlay(OverlayInfo::new(kind.as_str(), options.clone(), payload))
    }

    fn send(&self, command: ViewerCommand) {
        debug!(
            "Sending {} for overlay {:?}",
            command.event_name(),
            command.overlay_name()
        );
        self.widget.send(command);
    }

    /// Add markers as a catalog layer
    pub fn add_markers(
        &mut self,
        markers: Vec<Marker>,
        options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord> {
        let default_name = self.config.default_catalog_name.clone();
        let options = self.resolve_name(options, &default_name);

        let record = self.register(
            OverlayKind::Marker,
            &options,
            OverlayPayload::Markers {
                markers: markers.clone(),
            },
        )?;
        self.send(ViewerCommand::AddMarker { markers, options });
        Ok(record)
    }

    /// Add a catalog loaded by the front end from a VOTable URL
    pub fn add_catalog_from_url(
        &mut self,
        votable_url: impl Into<String>,
        options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord> {
        let votable_url = votable_url.into();
        let default_name = self.config.default_catalog_name.clone();
        let options = self.resolve_name(options, &default_name);

        let record = self.register(
            OverlayKind::Catalog,
            &options,
            OverlayPayload::Catalog {
                votable_url: votable_url.clone(),
            },
        )?;
        self.send(ViewerCommand::AddCatalogFromUrl {
            votable_url,
            options,
        });
        Ok(record)
    }

    /// Add a source table drawn with `shape`
    ///
    /// The record keeps `shape` (and any error-shape option) in its options so
    /// that [`update_overlay`](Self::update_overlay) can redraw the table the
    /// same way; the command carries `shape` as its own field instead.
    pub fn add_table(
        &mut self,
        table: impl Into<Arc<SourceTable>>,
        shape: TableShape,
        mut options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord> {
        let table = table.into();
        let resolved = shape.resolve(&table)?;
        if let Some((key, value)) = resolved.error_option {
            options.insert(key, value);
        }
        options.insert("shape", resolved.shape);

        let default_name = self.config.default_catalog_name.clone();
        let options = self.resolve_name(options, &default_name);

        let record = self.register(
            OverlayKind::Table,
            &options,
            OverlayPayload::Table {
                table: Arc::clone(&table),
            },
        )?;

        let mut command_options = options;
        let shape = command_options
            .remove("shape")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| self.config.default_table_shape.clone());
        self.send(ViewerCommand::AddTable {
            table,
            shape,
            options: command_options,
        });
        Ok(record)
    }

    /// Add region objects as a graphic overlay
    ///
    /// Fails with [`OverlayError::MissingDependency`] when built without the
    /// `regions` feature.
    pub fn add_graphic_overlay_from_region(
        &mut self,
        regions: Vec<Region>,
        options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord> {
        if !cfg!(feature = "regions") {
            return Err(OverlayError::MissingDependency("regions"));
        }

        let regions_infos: Vec<RegionInfo> = regions.iter().map(Region::to_info).collect();
        let default_name = self.config.default_overlay_name.clone();
        let options = self.resolve_name(options, &default_name);

        let record = self.register(
            OverlayKind::OverlayRegion,
            &options,
            OverlayPayload::Regions {
                regions,
                regions_infos: regions_infos.clone(),
            },
        )?;
        self.send(ViewerCommand::AddGraphicOverlayFromRegion {
            regions_infos,
            options,
        });
        Ok(record)
    }

    /// Add STC-S strings as a graphic overlay
    pub fn add_graphic_overlay_from_stcs<I, S>(
        &mut self,
        stc_strings: I,
        options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stc_strings: Vec<String> = stc_strings.into_iter().map(Into::into).collect();
        let default_name = self.config.default_overlay_name.clone();
        let options = self.resolve_name(options, &default_name);

        let regions_infos: Vec<RegionInfo> = stc_strings
            .iter()
            .map(|stcs| RegionInfo::stcs(stcs.as_str(), &options))
            .collect();

        let record = self.register(
            OverlayKind::OverlayStcs,
            &options,
            OverlayPayload::Stcs {
                stc_strings,
                regions_infos: regions_infos.clone(),
            },
        )?;
        self.send(ViewerCommand::AddGraphicOverlayFromStcs {
            regions_infos,
            options,
        });
        Ok(record)
    }

    /// Load a table into the viewer
    ///
    /// With `load_footprints`, the `s_region` column is added as an STC-S
    /// overlay, which is returned. With `update_viewport`, the view is
    /// centred on the mean position of the rows (see
    /// [`SourceTable::mean_position`]); a table without any known position
    /// leaves the view where it is. Both are checked before either is applied.
    pub fn load_table(
        &mut self,
        table: &SourceTable,
        load_footprints: bool,
        update_viewport: bool,
    ) -> OverlayResult<Option<OverlayRecord>> {
        let footprints = if load_footprints {
            Some(footprints_of(table)?)
        } else {
            None
        };

        let center = if update_viewport {
            match table.mean_position()? {
                Some((ra, dec)) => Some(SkyCoord::new(ra, dec)?),
                None => {
                    warn!("No row of the table has a position, keeping the current view");
                    None
                }
            }
        } else {
            None
        };

        let record = footprints
            .map(|footprints| self.add_graphic_overlay_from_stcs(footprints, OverlayOptions::new()))
            .transpose()?;

        if let Some(center) = center {
            debug!("Centring viewer {} on table position {}", self.widget.id(), center);
            self.widget.set_target(center);
        }
        Ok(record)
    }

    /// Remove one or more overlays with a single front-end command
    ///
    /// The command is sent with every requested name before the registry is
    /// checked, so valid layers are removed from the front end even when the
    /// batch names an unknown one.
    pub fn remove_overlay(&mut self, targets: impl Into<OverlayTargets>) -> OverlayResult<()> {
        let overlay_names = targets.into().into_names();
        self.send(ViewerCommand::RemoveOverlay {
            overlay_names: overlay_names.clone(),
        });

        for name in overlay_names {
            if !self.overlays.contains(&name) {
                return Err(OverlayError::UnknownOverlay(name));
            }
            self.overlays.pop(&name)?;
        }
        Ok(())
    }

    /// Replace `record` by a layer with `new_options` merged over its options
    ///
    /// `record` must still be the layer registered under its name; a record
    /// that was removed, or whose name now belongs to another layer, fails
    /// with [`OverlayError::UnknownOverlay`] before any command is sent.
    /// Table records keep their `shape` option, so an update redraws the
    /// same marker shape unless `new_options` names another one.
    pub fn update_overlay(
        &mut self,
        record: OverlayRecord,
        new_options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord> {
        if new_options.is_empty() {
            return Err(OverlayError::EmptyUpdate);
        }
        if self.overlays.get(record.name()) != Some(&record) {
            return Err(OverlayError::UnknownOverlay(record.name().to_string()));
        }

        self.remove_overlay(&record)?;

        let (options, payload) = record.into_parts();
        let options = options.merged(&new_options);

        match payload {
            OverlayPayload::Markers { markers } => self.add_markers(markers, options),
            OverlayPayload::Catalog { votable_url } => {
                self.add_catalog_from_url(votable_url, options)
            }
            OverlayPayload::Table { table } => {
                let shape = options
                    .get_str("shape")
                    .unwrap_or(self.config.default_table_shape.as_str())
                    .to_string();
                self.add_table(table, TableShape::Named(shape), options)
            }
            OverlayPayload::Regions { regions, .. } => {
                let regions = regions
                    .iter()
                    .map(|region| region.restyled(&options))
                    .collect();
                self.add_graphic_overlay_from_region(regions, options)
            }
            OverlayPayload::Stcs { stc_strings, .. } => {
                self.add_graphic_overlay_from_stcs(stc_strings, options)
            }
        }
    }
}

/// STC-S strings of the `s_region` column
fn footprints_of(table: &SourceTable) -> OverlayResult<Vec<String>> {
    let column = table
        .column(S_REGION_COLUMN)
        .ok_or(OverlayError::MissingFootprints)?;
    column
        .values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or(OverlayError::InvalidFootprint(row))
        })
        .collect()
}

impl fmt::Debug for SkyViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkyViewer")
            .field("widget", &self.widget.id())
            .field("overlays", &self.overlays)
            .field("warnings", &self.warnings)
            .finish()
    }
}

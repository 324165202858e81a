//! Base correlation term structure.
//!
//! A surface of base correlations over (tranche maturity, detachment loss
//! level), read from a table of live quotes and interpolated in two
//! dimensions.
//!
//! # Invalidation
//!
//! The surface registers one notifier with every quote and, for a moving
//! reference date, with the evaluation date. A notification marks the
//! snapshot stale and is forwarded to the surface's own observers. The next
//! query rebuilds times, snapshot and interpolation before answering, so no
//! query ever sees a stale value. [`BaseCorrelationTermStructure::update`]
//! rebuilds eagerly.
//!
//! # Non-local interpolation
//!
//! With a non-local scheme such as [`BicubicSpline`](basecorr_math::interpolation2d::BicubicSpline)
//! the correlation implied at an elapsed tenor depends on every column of
//! the grid. As tenors expire and drop off the front, values at already
//! calibrated maturities move even though their quotes did not.
//! [`BaseCorrelationTermStructure::is_local_interpolation`] reports which
//! case applies.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use basecorr_core::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
use basecorr_core::daycounts::DayCountConvention;
use basecorr_core::observer::{Observable, Observer};
use basecorr_core::quotes::Quote;
use basecorr_core::schedule::DateGenerationRule;
use basecorr_core::settings::EvaluationDate;
use basecorr_core::types::{Date, Period};
use basecorr_math::interpolation2d::{Interpolation2DFactory, Interpolation2DMethod, Interpolator2D};
use ndarray::Array2;
use parking_lot::RwLock;

use crate::error::{CorrelationError, CorrelationResult};
use crate::maturity::MaturityGrid;
use crate::quote_matrix::{ColumnAlignment, QuoteMatrix};
use crate::term_structure::{CorrelationTermStructure, CorrelationTermStructureBase};
use crate::validation::{check_dimensions, check_loss_levels, check_tenors};

/// Marks the surface stale and forwards notifications downstream.
struct SurfaceNotifier {
    stale: AtomicBool,
    observers: Observable,
}

impl SurfaceNotifier {
    fn new() -> Self {
        Self {
            stale: AtomicBool::new(false),
            observers: Observable::new(),
        }
    }

    fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    fn mark_stale(&self) {
        self.stale.store(true, Ordering::Release);
    }

    fn mark_fresh(&self) {
        self.stale.store(false, Ordering::Release);
    }
}

impl Observer for SurfaceNotifier {
    fn update(&self) {
        self.mark_stale();
        tracing::trace!("base correlation inputs changed, snapshot marked stale");
        self.observers.notify();
    }
}

/// Times, correlation snapshot and interpolation, rebuilt together.
struct SurfaceState<I> {
    times: Vec<f64>,
    correlations: Array2<f64>,
    interpolation: I,
}

/// Base correlation surface over tranche maturities and loss levels.
///
/// Rows of the quote table follow the loss levels and columns follow the
/// full tenor list. Tenors maturing on or before the reference date at
/// construction are dropped from the front; the remaining surface columns
/// read the tail of the quote table.
pub struct BaseCorrelationTermStructure<F: Interpolation2DFactory = Interpolation2DMethod> {
    base: CorrelationTermStructureBase,
    grid: MaturityGrid,
    loss_levels: Vec<f64>,
    quotes: QuoteMatrix,
    alignment: ColumnAlignment,
    factory: F,
    extrapolation: AtomicBool,
    notifier: Arc<SurfaceNotifier>,
    state: RwLock<SurfaceState<F::Output>>,
}

impl BaseCorrelationTermStructure<Interpolation2DMethod> {
    /// Starts a builder with bilinear interpolation.
    #[must_use]
    pub fn builder() -> BaseCorrelationBuilder<Interpolation2DMethod> {
        BaseCorrelationBuilder::new()
    }
}

impl<F: Interpolation2DFactory> BaseCorrelationTermStructure<F> {
    /// Re-reads every quote and rebuilds the interpolation, then notifies
    /// observers of the surface.
    ///
    /// # Errors
    ///
    /// Returns the rebuild error. The surface stays stale and observers are
    /// not notified.
    pub fn update(&self) -> CorrelationResult<()> {
        self.notifier.mark_stale();
        self.rebuild()?;
        self.notifier.observers.notify();
        Ok(())
    }

    fn rebuild(&self) -> CorrelationResult<()> {
        // Cleared first so a notification arriving mid-rebuild is not lost.
        self.notifier.mark_fresh();
        match build_state(
            &self.base,
            &self.grid,
            &self.loss_levels,
            &self.quotes,
            &self.alignment,
            &self.factory,
        ) {
            Ok(state) => {
                *self.state.write() = state;
                tracing::trace!(
                    "rebuilt {}x{} base correlation snapshot",
                    self.loss_levels.len(),
                    self.grid.len()
                );
                Ok(())
            }
            Err(err) => {
                self.notifier.mark_stale();
                tracing::warn!("base correlation rebuild failed: {err}");
                Err(err)
            }
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&SurfaceState<F::Output>) -> R) -> CorrelationResult<R> {
        if self.notifier.is_stale() {
            self.rebuild()?;
        }
        let state = self.state.read();
        Ok(f(&*state))
    }

    /// Allows queries outside the grid without passing `extrapolate`.
    pub fn enable_extrapolation(&self) {
        self.extrapolation.store(true, Ordering::Release);
    }

    /// Restores out-of-grid queries to errors unless `extrapolate` is passed.
    pub fn disable_extrapolation(&self) {
        self.extrapolation.store(false, Ordering::Release);
    }

    /// Returns true if extrapolation is enabled on the structure.
    #[must_use]
    pub fn allows_extrapolation(&self) -> bool {
        self.extrapolation.load(Ordering::Acquire)
    }

    /// Registers an observer notified whenever the surface changes.
    pub fn subscribe(&self, observer: Weak<dyn Observer>) {
        self.notifier.observers.register(observer);
    }

    /// Live tranche maturity dates.
    #[must_use]
    pub fn tranche_dates(&self) -> &[Date] {
        self.grid.dates()
    }

    /// Tranche maturities as year fractions from the current reference date.
    ///
    /// # Errors
    ///
    /// Returns the rebuild error if the surface was stale.
    pub fn tranche_times(&self) -> CorrelationResult<Vec<f64>> {
        self.with_state(|s| s.times.clone())
    }

    /// Live tenors.
    #[must_use]
    pub fn tenors(&self) -> &[Period] {
        self.grid.tenors()
    }

    /// Maturity grid, with the number of expired tenors.
    #[must_use]
    pub fn maturity_grid(&self) -> &MaturityGrid {
        &self.grid
    }

    /// Loss levels.
    #[must_use]
    pub fn loss_levels(&self) -> &[f64] {
        &self.loss_levels
    }

    /// Copy of the correlation snapshot, `[loss_row][tenor_column]`.
    ///
    /// # Errors
    ///
    /// Returns the rebuild error if the surface was stale.
    pub fn correlations(&self) -> CorrelationResult<Array2<f64>> {
        self.with_state(|s| s.correlations.clone())
    }

    /// Mapping from surface columns to quote table columns.
    #[must_use]
    pub fn column_alignment(&self) -> ColumnAlignment {
        self.alignment
    }

    /// The quote table.
    #[must_use]
    pub fn quotes(&self) -> &QuoteMatrix {
        &self.quotes
    }

    /// Settlement lag in business days.
    #[must_use]
    pub fn settlement_days(&self) -> u32 {
        self.base.settlement_days()
    }

    /// Calendar.
    #[must_use]
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        self.base.calendar()
    }

    /// Business day convention.
    #[must_use]
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.base.business_day_convention()
    }

    /// Day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.base.day_count()
    }

    /// Interpolation factory.
    #[must_use]
    pub fn interpolation(&self) -> &F {
        &self.factory
    }

    /// Returns true if a quote only moves the surface near its own knot.
    #[must_use]
    pub fn is_local_interpolation(&self) -> bool {
        self.factory.is_local()
    }
}

impl<F: Interpolation2DFactory> CorrelationTermStructure for BaseCorrelationTermStructure<F> {
    fn reference_date(&self) -> CorrelationResult<Date> {
        self.base.reference_date()
    }

    fn time_from_reference(&self, date: Date) -> CorrelationResult<f64> {
        self.base.time_from_reference(date)
    }

    fn max_date(&self) -> Date {
        self.grid.max_date()
    }

    fn correlation_at_time(&self, t: f64, loss_level: f64, extrapolate: bool) -> CorrelationResult<f64> {
        let allow = extrapolate || self.allows_extrapolation();
        self.with_state(|s| s.interpolation.interpolate(t, loss_level, allow))?
            .map_err(CorrelationError::from)
    }
}

impl<F: Interpolation2DFactory> fmt::Debug for BaseCorrelationTermStructure<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseCorrelationTermStructure")
            .field("base", &self.base)
            .field("grid", &self.grid.to_string())
            .field("loss_levels", &self.loss_levels)
            .field("interpolation", &self.factory.name())
            .field("stale", &self.notifier.is_stale())
            .finish_non_exhaustive()
    }
}

fn build_state<F: Interpolation2DFactory>(
    base: &CorrelationTermStructureBase,
    grid: &MaturityGrid,
    loss_levels: &[f64],
    quotes: &QuoteMatrix,
    alignment: &ColumnAlignment,
    factory: &F,
) -> CorrelationResult<SurfaceState<F::Output>> {
    let reference = base.reference_date()?;
    let times = grid
        .dates()
        .iter()
        .map(|d| base.year_fraction(reference, *d))
        .collect::<CorrelationResult<Vec<_>>>()?;

    let correlations = quotes.snapshot(alignment)?;
    check_dimensions(correlations.nrows(), correlations.ncols(), loss_levels.len(), grid.len())?;

    let interpolation = factory.build(&times, loss_levels, correlations.view())?;

    Ok(SurfaceState {
        times,
        correlations,
        interpolation,
    })
}

/// Builder for [`BaseCorrelationTermStructure`].
///
/// Tenors, loss levels, quotes and a reference date source are required.
/// Defaults: no settlement lag, weekend calendar, Following, ACT/365F, start
/// at the reference date, plain calendar advance, bilinear interpolation.
pub struct BaseCorrelationBuilder<F = Interpolation2DMethod> {
    settlement_days: u32,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    day_count: DayCountConvention,
    tenors: Vec<Period>,
    loss_levels: Vec<f64>,
    quotes: Option<Vec<Vec<Arc<dyn Quote>>>>,
    start_date: Option<Date>,
    rule: Option<DateGenerationRule>,
    evaluation_date: Option<Arc<EvaluationDate>>,
    reference_date: Option<Date>,
    factory: F,
    extrapolation: bool,
}

impl BaseCorrelationBuilder<Interpolation2DMethod> {
    /// Creates a builder with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settlement_days: 0,
            calendar: Arc::new(WeekendCalendar),
            convention: BusinessDayConvention::Following,
            day_count: DayCountConvention::Act365Fixed,
            tenors: Vec::new(),
            loss_levels: Vec::new(),
            quotes: None,
            start_date: None,
            rule: None,
            evaluation_date: None,
            reference_date: None,
            factory: Interpolation2DMethod::Bilinear,
            extrapolation: false,
        }
    }
}

impl Default for BaseCorrelationBuilder<Interpolation2DMethod> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Interpolation2DFactory> BaseCorrelationBuilder<F> {
    /// Sets the settlement lag in business days. Ignored for a fixed
    /// reference date.
    #[must_use]
    pub fn with_settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the business day convention.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the tranche tenors, sorted.
    #[must_use]
    pub fn with_tenors(mut self, tenors: Vec<Period>) -> Self {
        self.tenors = tenors;
        self
    }

    /// Sets the detachment loss levels, sorted.
    #[must_use]
    pub fn with_loss_levels(mut self, loss_levels: Vec<f64>) -> Self {
        self.loss_levels = loss_levels;
        self
    }

    /// Sets the quote table, `[loss_row][tenor_column]` over all tenors.
    #[must_use]
    pub fn with_quotes(mut self, quotes: Vec<Vec<Arc<dyn Quote>>>) -> Self {
        self.quotes = Some(quotes);
        self
    }

    /// Sets the date tenors are applied to.
    #[must_use]
    pub fn with_start_date(mut self, start: Date) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Generates maturities through a quarterly schedule under `rule`.
    #[must_use]
    pub fn with_rule(mut self, rule: DateGenerationRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Follows a shared evaluation date.
    #[must_use]
    pub fn with_evaluation_date(mut self, evaluation_date: Arc<EvaluationDate>) -> Self {
        self.evaluation_date = Some(evaluation_date);
        self.reference_date = None;
        self
    }

    /// Uses a fixed reference date.
    #[must_use]
    pub fn with_reference_date(mut self, reference_date: Date) -> Self {
        self.reference_date = Some(reference_date);
        self.evaluation_date = None;
        self
    }

    /// Enables extrapolation on the built structure.
    #[must_use]
    pub fn with_extrapolation(mut self, enabled: bool) -> Self {
        self.extrapolation = enabled;
        self
    }

    /// Selects the interpolation scheme.
    #[must_use]
    pub fn with_interpolation<G: Interpolation2DFactory>(self, factory: G) -> BaseCorrelationBuilder<G> {
        BaseCorrelationBuilder {
            settlement_days: self.settlement_days,
            calendar: self.calendar,
            convention: self.convention,
            day_count: self.day_count,
            tenors: self.tenors,
            loss_levels: self.loss_levels,
            quotes: self.quotes,
            start_date: self.start_date,
            rule: self.rule,
            evaluation_date: self.evaluation_date,
            reference_date: self.reference_date,
            factory,
            extrapolation: self.extrapolation,
        }
    }

    /// Validates the inputs and builds the surface.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::InvalidInput` for invalid tenors or loss
    /// levels, a quote table that does not match the grid, or a grid whose
    /// tenors have all expired. Date generation and quote errors are
    /// propagated.
    pub fn build(self) -> CorrelationResult<BaseCorrelationTermStructure<F>> {
        check_tenors(&self.tenors)?;
        check_loss_levels(&self.loss_levels)?;

        let quotes = QuoteMatrix::new(
            self.quotes
                .ok_or_else(|| CorrelationError::invalid_input("no correlation quotes given"))?,
        )?;

        let base = match (self.evaluation_date, self.reference_date) {
            (Some(eval), _) => CorrelationTermStructureBase::moving(
                self.settlement_days,
                self.calendar,
                self.convention,
                self.day_count,
                eval,
            ),
            (None, Some(date)) => {
                CorrelationTermStructureBase::fixed(date, self.calendar, self.convention, self.day_count)
            }
            (None, None) => {
                return Err(CorrelationError::invalid_input(
                    "no evaluation date or reference date given",
                ))
            }
        };

        let reference = base.reference_date()?;
        let start = self.start_date.unwrap_or(reference);
        let grid = MaturityGrid::generate(
            start,
            &self.tenors,
            self.rule,
            base.calendar(),
            base.business_day_convention(),
            reference,
        )?;

        let alignment = ColumnAlignment::new(quotes.columns(), grid.len(), grid.expired_count())?;
        check_dimensions(
            quotes.rows(),
            quotes.columns() - alignment.offset(),
            self.loss_levels.len(),
            grid.len(),
        )?;

        let state = build_state(&base, &grid, &self.loss_levels, &quotes, &alignment, &self.factory)?;

        let notifier = Arc::new(SurfaceNotifier::new());
        let as_observer: Arc<dyn Observer> = notifier.clone();
        let weak = Arc::downgrade(&as_observer);
        quotes.subscribe_all(&weak);
        base.subscribe_to_reference(weak);

        tracing::debug!(
            "built base correlation surface: {} loss levels, tenors {grid}, {} interpolation",
            self.loss_levels.len(),
            self.factory.name()
        );

        Ok(BaseCorrelationTermStructure {
            base,
            grid,
            loss_levels: self.loss_levels,
            quotes,
            alignment,
            factory: self.factory,
            extrapolation: AtomicBool::new(self.extrapolation),
            notifier,
            state: RwLock::new(state),
        })
    }
}

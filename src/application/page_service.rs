// Page service - Use case for building page views from the record store
use crate::application::filter::FilterCriteria;
use crate::application::pages::dashboard::{self, DashboardInput};
use crate::application::pages::{reports, DomainPage};
use crate::application::record_store::{fetch, FetchError, Loaded, RecordStore};
use crate::application::refresh::{Latest, RequestSequencer};
use crate::application::view_model::{validated, Clock, Thresholds, ViewContext};
use crate::domain::family::Family;
use crate::domain::record::{Domain, Record};
use crate::domain::report::ReportTemplate;
use crate::domain::student::Student;
use crate::domain::tutor::Tutor;
use crate::domain::view::{AreaImpact, PageView, RecordWarning};
use crate::domain::volunteer::Volunteer;
use crate::domain::woman::WomanInProgram;
use std::sync::Arc;

#[derive(Clone)]
pub struct PageService {
    store: Arc<dyn RecordStore>,
    thresholds: Thresholds,
    clock: Clock,
}

impl PageService {
    pub fn new(store: Arc<dyn RecordStore>, thresholds: Thresholds, clock: Clock) -> Self {
        Self {
            store,
            thresholds,
            clock,
        }
    }

    pub fn context(&self) -> ViewContext {
        ViewContext::new(self.clock.today(), self.thresholds.clone())
    }

    /// Fetch, validate and derive one domain page.
    pub async fn domain_view<R: DomainPage>(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<PageView<R::Row>, FetchError> {
        let loaded = fetch::<R>(self.store.as_ref()).await?;
        let flagged = self.store.flagged(R::DOMAIN).await?;
        let mut warnings = Vec::new();
        let records = checked(loaded, &mut warnings);

        tracing::debug!(
            "Building {} page from {} records ({} skipped)",
            R::DOMAIN,
            records.len(),
            warnings.len()
        );

        Ok(R::build_view(&records, &flagged, criteria, &self.context()).with_warnings(warnings))
    }

    /// Like [`Self::domain_view`], but a result that finishes after a newer
    /// refresh on the same sequencer is discarded, errors included.
    pub async fn view_latest<R: DomainPage>(
        &self,
        sequencer: &RequestSequencer,
        criteria: &FilterCriteria,
    ) -> Result<Latest<PageView<R::Row>>, FetchError> {
        sequencer
            .run(R::DOMAIN.slug(), self.domain_view::<R>(criteria))
            .await
    }

    /// Every domain, fetched concurrently and validated.
    pub async fn dashboard_input(&self) -> Result<DashboardInput, FetchError> {
        let store = self.store.as_ref();
        let (families, flagged_families, students, tutors, volunteers, women) = tokio::try_join!(
            fetch::<Family>(store),
            store.flagged(Domain::Families),
            fetch::<Student>(store),
            fetch::<Tutor>(store),
            fetch::<Volunteer>(store),
            fetch::<WomanInProgram>(store),
        )?;

        let mut warnings = Vec::new();
        Ok(DashboardInput {
            families: checked(families, &mut warnings),
            flagged_families,
            students: checked(students, &mut warnings),
            tutors: checked(tutors, &mut warnings),
            volunteers: checked(volunteers, &mut warnings),
            women: checked(women, &mut warnings),
            warnings,
        })
    }

    pub async fn dashboard(&self) -> Result<PageView<AreaImpact>, FetchError> {
        let input = self.dashboard_input().await?;
        Ok(dashboard::build(&input, &self.context()))
    }

    pub async fn reports(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<PageView<ReportTemplate>, FetchError> {
        let input = self.dashboard_input().await?;
        Ok(reports::build(&input, criteria, &self.context()))
    }

    pub async fn reports_latest(
        &self,
        sequencer: &RequestSequencer,
        criteria: &FilterCriteria,
    ) -> Result<Latest<PageView<ReportTemplate>>, FetchError> {
        sequencer.run(reports::PAGE, self.reports(criteria)).await
    }
}

/// Keep the records that decoded and validated; everything else becomes a
/// warning, decode rejects first.
fn checked<R: Record>(loaded: Loaded<R>, warnings: &mut Vec<RecordWarning>) -> Vec<R> {
    warnings.extend(loaded.rejected);
    let (records, invalid) = validated(loaded.records);
    warnings.extend(invalid);
    records
}

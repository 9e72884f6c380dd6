use std::{
    collections::{BTreeSet, HashSet},
    io,
    path::Path,
    sync::Arc,
};

use jfs::Store;
use parking_lot::Mutex;

use crate::{api::FavoritesApi, json::Report, Error, Result};

/// Local persistence of the favorite report ids.
pub trait FavoriteIdStore: Send + Sync {
    fn load(&self) -> io::Result<BTreeSet<String>>;
    fn save(&self, ids: &BTreeSet<String>) -> io::Result<()>;
}

const FAVORITE_IDS_KEY: &str = "favorite-ids";

/// Keeps the id set in a JSON file.
pub struct JsonFileIdStore {
    json_store: Mutex<Store>,
}

impl JsonFileIdStore {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Mutex::new(Store::new(directory)?);
        Ok(Self { json_store })
    }
}

impl FavoriteIdStore for JsonFileIdStore {
    fn load(&self) -> io::Result<BTreeSet<String>> {
        match self.json_store.lock().get(FAVORITE_IDS_KEY) {
            Ok(ids) => Ok(ids),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(err) => Err(err),
        }
    }

    fn save(&self, ids: &BTreeSet<String>) -> io::Result<()> {
        self.json_store.lock().save_with_id(ids, FAVORITE_IDS_KEY)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryIdStore(Mutex<BTreeSet<String>>);

impl FavoriteIdStore for InMemoryIdStore {
    fn load(&self) -> io::Result<BTreeSet<String>> {
        Ok(self.0.lock().clone())
    }

    fn save(&self, ids: &BTreeSet<String>) -> io::Result<()> {
        *self.0.lock() = ids.clone();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct State {
    /// Newest first
    reports: Vec<Report>,
    ids: BTreeSet<String>,
    in_flight: HashSet<String>,
}

/// Everything needed to restore a single entry.
struct Undo {
    id: String,
    was_favorite: bool,
    entry: Option<(usize, Report)>,
}

impl State {
    fn snapshot(&self, id: &str) -> Undo {
        let entry = self
            .reports
            .iter()
            .position(|r| r.id == id)
            .map(|index| (index, self.reports[index].clone()));
        Undo {
            id: id.to_owned(),
            was_favorite: self.ids.contains(id),
            entry,
        }
    }

    fn insert(&mut self, report: Report) {
        self.ids.insert(report.id.clone());
        self.reports.retain(|r| r.id != report.id);
        self.reports.push(report);
        sort_newest_first(&mut self.reports);
    }

    fn remove(&mut self, id: &str) {
        self.ids.remove(id);
        self.reports.retain(|r| r.id != id);
    }

    fn restore(&mut self, undo: Undo) {
        let Undo {
            id,
            was_favorite,
            entry,
        } = undo;
        self.reports.retain(|r| r.id != id);
        if let Some((index, report)) = entry {
            let index = index.min(self.reports.len());
            self.reports.insert(index, report);
        }
        if was_favorite {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }
}

fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Favorite reports of the current user.
///
/// Changes are applied locally first and rolled back if the
/// server rejects them.
pub struct FavoritesCache {
    api: Arc<dyn FavoritesApi>,
    store: Arc<dyn FavoriteIdStore>,
    state: Mutex<State>,
}

/// Marks a report id as busy until dropped.
struct InFlight<'a> {
    cache: &'a FavoritesCache,
    id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.cache.state.lock().in_flight.remove(&self.id);
    }
}

impl FavoritesCache {
    /// Starts with the persisted ids, the reports are loaded
    /// by [`FavoritesCache::fetch_all`].
    pub fn new(api: Arc<dyn FavoritesApi>, store: Arc<dyn FavoriteIdStore>) -> Self {
        let ids = store.load().unwrap_or_else(|err| {
            log::warn!("Unable to load favorite ids: {err}");
            BTreeSet::new()
        });
        let state = Mutex::new(State {
            ids,
            ..Default::default()
        });
        Self { api, store, state }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.lock().ids.contains(id)
    }

    pub fn favorites(&self) -> Vec<Report> {
        self.state.lock().reports.clone()
    }

    pub fn ids(&self) -> BTreeSet<String> {
        self.state.lock().ids.clone()
    }

    /// Returns whether the report is a favorite afterwards.
    pub async fn toggle(&self, report: Report) -> Result<bool> {
        if self.is_favorite(&report.id) {
            self.remove(&report.id).await?;
            Ok(false)
        } else {
            self.add(report).await?;
            Ok(true)
        }
    }

    pub async fn add(&self, report: Report) -> Result<()> {
        let id = report.id.clone();
        let _in_flight = self.begin(&id)?;
        let undo = self.apply_locally(&id, |state| state.insert(report));
        match self.api.add_favorite(&id).await {
            Ok(()) | Err(Error::Conflict(_)) => Ok(()),
            Err(err) => {
                log::info!("Rolling back favorite {id}: {err}");
                self.rollback(undo);
                Err(err)
            }
        }
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        let _in_flight = self.begin(id)?;
        let undo = self.apply_locally(id, |state| state.remove(id));
        match self.api.remove_favorite(id).await {
            Ok(()) | Err(Error::NotFound(_)) => Ok(()),
            Err(err) => {
                log::info!("Rolling back removal of favorite {id}: {err}");
                self.rollback(undo);
                Err(err)
            }
        }
    }

    /// Replace the local state with the server version.
    pub async fn fetch_all(&self) -> Result<Vec<Report>> {
        let mut reports = self.api.favorites().await?;
        sort_newest_first(&mut reports);
        let ids = reports.iter().map(|r| r.id.clone()).collect();
        {
            let mut state = self.state.lock();
            state.reports.clone_from(&reports);
            state.ids = ids;
            self.persist(&state.ids);
        }
        Ok(reports)
    }

    /// Replace only the id set. The local state is kept on failure.
    pub async fn sync_ids(&self) -> Result<()> {
        let ids: BTreeSet<_> = self.api.favorite_ids().await?.into_iter().collect();
        let mut state = self.state.lock();
        state.reports.retain(|r| ids.contains(&r.id));
        state.ids = ids;
        self.persist(&state.ids);
        Ok(())
    }

    /// Forget everything, e.g. after logging out.
    pub fn clear_local(&self) {
        let mut state = self.state.lock();
        state.reports.clear();
        state.ids.clear();
        self.persist(&state.ids);
    }

    fn begin(&self, id: &str) -> Result<InFlight<'_>> {
        if !self.state.lock().in_flight.insert(id.to_owned()) {
            return Err(Error::Busy(id.to_owned()));
        }
        Ok(InFlight {
            cache: self,
            id: id.to_owned(),
        })
    }

    fn apply_locally(&self, id: &str, f: impl FnOnce(&mut State)) -> Undo {
        let mut state = self.state.lock();
        let undo = state.snapshot(id);
        f(&mut state);
        self.persist(&state.ids);
        undo
    }

    fn rollback(&self, undo: Undo) {
        let mut state = self.state.lock();
        state.restore(undo);
        self.persist(&state.ids);
    }

    fn persist(&self, ids: &BTreeSet<String>) {
        if let Err(err) = self.store.save(ids) {
            log::warn!("Unable to save favorite ids: {err}");
        }
    }
}

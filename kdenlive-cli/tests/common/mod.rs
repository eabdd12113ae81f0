//! A scripted Kdenlive session for the workflow tests.
//!
//! Only the calls the workflows make are answered; anything else replies with nothing.

#![allow(dead_code)]

use kdenlive_api::bus::{Arg, Record, RemoteValue, Transport, TransportMode};
use kdenlive_api::{BusClient, BusError, BusSettings, Resolve};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

pub const CLIP_LENGTH: i64 = 125;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub bin_id: String,
    pub track: i64,
    pub position: i64,
    pub length: i64,
}

#[derive(Debug)]
pub struct Session {
    /// `(id, name, audio)`
    pub tracks: Vec<(i64, String, bool)>,
    /// Bin id to `(name, folder)`
    pub bin: BTreeMap<i64, (String, String)>,
    pub clips: BTreeMap<i64, Placed>,
    pub guides: Vec<(i64, String, i64)>,
    pub mixes: Vec<(i64, i64, i64)>,
    pub folders: Vec<String>,
    pub position: i64,
    pub playing: bool,
    pub calls: Vec<String>,
    /// File names whose `addProjectClip` is silently ignored.
    pub unreadable: Vec<String>,
    next_clip: i64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            tracks: vec![(0, "V1".into(), false), (1, "A1".into(), true)],
            bin: BTreeMap::new(),
            clips: BTreeMap::new(),
            guides: Vec::new(),
            mixes: Vec::new(),
            folders: Vec::new(),
            position: 0,
            playing: false,
            calls: Vec::new(),
            unreadable: Vec::new(),
            next_clip: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    state: Rc<RefCell<Session>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> std::cell::Ref<'_, Session> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> std::cell::RefMut<'_, Session> {
        self.state.borrow_mut()
    }

    pub fn count(&self, method: &str) -> usize {
        self.state().calls.iter().filter(|m| *m == method).count()
    }

    /// Bin clip plus a timeline clip of `length` frames, placed without scripting calls.
    pub fn place(&self, name: &str, track: i64, position: i64, length: i64) -> i64 {
        let mut state = self.state_mut();
        let bin_id = state.bin.keys().max().copied().unwrap_or(0) + 1;
        state.bin.insert(bin_id, (name.to_string(), "-1".to_string()));
        let id = state.next_clip;
        state.next_clip += 1;
        state.clips.insert(
            id,
            Placed {
                bin_id: bin_id.to_string(),
                track,
                position,
                length,
            },
        );
        id
    }

    /// Names of the clips on `track`, in timeline order.
    pub fn track_names(&self, track: i64) -> Vec<String> {
        let state = self.state();
        let mut clips: Vec<_> = state.clips.values().filter(|c| c.track == track).collect();
        clips.sort_by_key(|c| c.position);
        clips
            .into_iter()
            .map(|c| bin_name(&state, &c.bin_id))
            .collect()
    }

    fn answer(&self, method: &str, args: &[Arg]) -> RemoteValue {
        let mut state = self.state_mut();
        state.calls.push(method.to_string());

        match method {
            "scriptGetProjectName" => RemoteValue::from("Night Drive"),
            "scriptGetProjectFps" => RemoteValue::Float(25.0),

            "scriptGetAllTracksInfo" => RemoteValue::List(
                state
                    .tracks
                    .iter()
                    .map(|(id, name, audio)| {
                        let mut record = Record::new();
                        record.insert("id".into(), RemoteValue::Int(*id));
                        record.insert("name".into(), RemoteValue::from(name.as_str()));
                        record.insert("audio".into(), RemoteValue::Bool(*audio));
                        RemoteValue::Map(record)
                    })
                    .collect(),
            ),
            "scriptAddTrack" => {
                let id = state.tracks.iter().map(|t| t.0).max().unwrap_or(-1) + 1;
                let audio = matches!(args.get(1), Some(Arg::Bool(true)));
                state.tracks.push((id, text(args, 0), audio));
                RemoteValue::Int(id)
            }

            "scriptCreateFolder" => {
                state.folders.push(text(args, 0));
                RemoteValue::from((state.folders.len() + 9).to_string())
            }
            "addProjectClip" => {
                let url = text(args, 0);
                let folder = if args.len() > 1 { text(args, 1) } else { "-1".into() };
                let name = url.rsplit('/').next().unwrap_or_default().to_string();
                if !state.unreadable.contains(&name) {
                    let id = state.bin.keys().max().copied().unwrap_or(0) + 1;
                    state.bin.insert(id, (name, folder));
                }
                RemoteValue::Void
            }
            "scriptGetAllClipIds" => RemoteValue::List(
                state
                    .bin
                    .keys()
                    .map(|id| RemoteValue::from(id.to_string()))
                    .collect(),
            ),
            "scriptGetClipProperties" => {
                let id = text(args, 0);
                let mut record = Record::new();
                record.insert("id".into(), RemoteValue::from(id.as_str()));
                record.insert("name".into(), RemoteValue::from(bin_name(&state, &id)));
                RemoteValue::Map(record)
            }

            "scriptInsertClip" => {
                let bin_id = text(args, 0);
                let known = bin_id
                    .parse::<i64>()
                    .is_ok_and(|id| state.bin.contains_key(&id));
                if !known {
                    return RemoteValue::Int(-1);
                }
                let id = state.next_clip;
                state.next_clip += 1;
                state.clips.insert(
                    id,
                    Placed {
                        bin_id,
                        track: int(args, 1),
                        position: int(args, 2),
                        length: CLIP_LENGTH,
                    },
                );
                RemoteValue::Int(id)
            }
            "scriptGetTimelineClipInfo" => match state.clips.get(&int(args, 0)) {
                Some(clip) => RemoteValue::Map(clip_record(&state, int(args, 0), clip)),
                None => RemoteValue::Void,
            },
            "scriptGetClipsOnTrack" => {
                let track = int(args, 0);
                let mut clips: Vec<_> = state.clips.iter().filter(|(_, c)| c.track == track).collect();
                clips.sort_by_key(|(_, c)| c.position);
                RemoteValue::List(
                    clips
                        .into_iter()
                        .map(|(id, clip)| RemoteValue::Map(clip_record(&state, *id, clip)))
                        .collect(),
                )
            }
            "scriptResizeClip" => match state.clips.get_mut(&int(args, 0)) {
                Some(clip) => {
                    clip.length = int(args, 1);
                    RemoteValue::Int(clip.length)
                }
                None => RemoteValue::Int(-1),
            },
            "scriptDeleteTimelineClip" => RemoteValue::Bool(state.clips.remove(&int(args, 0)).is_some()),
            "scriptAddMix" => {
                let (a, b, length) = (int(args, 0), int(args, 1), int(args, 2));
                let adjacent = match (state.clips.get(&a), state.clips.get(&b)) {
                    (Some(a), Some(b)) => a.track == b.track && a.position + a.length == b.position,
                    _ => false,
                };
                if adjacent {
                    state.mixes.push((a, b, length));
                }
                RemoteValue::Bool(adjacent)
            }

            "scriptAddGuide" => {
                state.guides.push((int(args, 0), text(args, 1), int(args, 2)));
                RemoteValue::Bool(true)
            }
            "scriptSeek" => {
                state.position = int(args, 0);
                RemoteValue::Void
            }
            "scriptPlay" => {
                state.playing = true;
                RemoteValue::Void
            }
            "scriptGetPosition" => RemoteValue::Int(state.position),

            _ => RemoteValue::Void,
        }
    }
}

impl Transport for FakeSession {
    fn call(&self, _service: &str, method: &str, args: &[Arg]) -> Result<RemoteValue, BusError> {
        Ok(self.answer(method, args))
    }

    fn list_names(&self) -> Result<Vec<String>, BusError> {
        Ok(vec!["org.kde.kdenlive-777".to_string()])
    }
}

fn bin_name(state: &Session, bin_id: &str) -> String {
    bin_id
        .parse::<i64>()
        .ok()
        .and_then(|id| state.bin.get(&id))
        .map(|(name, _)| name.clone())
        .unwrap_or_default()
}

fn clip_record(state: &Session, id: i64, clip: &Placed) -> Record {
    let mut record = Record::new();
    record.insert("id".into(), RemoteValue::Int(id));
    record.insert("binId".into(), RemoteValue::from(clip.bin_id.as_str()));
    record.insert("trackId".into(), RemoteValue::Int(clip.track));
    record.insert("position".into(), RemoteValue::Int(clip.position));
    record.insert("duration".into(), RemoteValue::Int(clip.length));
    record.insert("name".into(), RemoteValue::from(bin_name(state, &clip.bin_id)));
    record
}

fn int(args: &[Arg], index: usize) -> i64 {
    match args.get(index) {
        Some(Arg::Int(n)) => *n,
        Some(other) => other.to_string().parse().unwrap_or(0),
        None => 0,
    }
}

fn text(args: &[Arg], index: usize) -> String {
    args.get(index).map(Arg::to_string).unwrap_or_default()
}

pub fn resolve(session: &FakeSession) -> Resolve {
    let settings = BusSettings {
        import_settle: Duration::ZERO,
        ..BusSettings::default()
    };
    let client =
        BusClient::from_transport(Box::new(session.clone()), TransportMode::Subprocess, settings)
            .with_sleeper(|_| {});
    Resolve::from_client(client)
}

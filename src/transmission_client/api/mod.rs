mod requests;
mod responses;

pub use requests::{
    FreeSpaceArgs, IdsArgs, NoArgs, RpcRequest, SessionGetArgs, SpeedLimitArgs, TorrentAddArgs,
    TorrentGetArgs, TorrentRemoveArgs, WantedArgs, FILE_FIELDS, TORRENT_FIELDS,
};
pub use responses::{
    AddedTorrentRaw, FreeSpaceResponse, RawFile, RawFileStat, RawTorrent, RpcResponse, SessionGetResponse,
    SessionStatsResponse, TorrentAddResponse, TorrentGetResponse, TrackerStat,
};

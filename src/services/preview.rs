//! Preview selection for actuality cards.

use crate::entities::{photos, videos, videos::VideoSource};

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// The single media item chosen to represent an actuality in list views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewSource<'a> {
    Image(&'a photos::Model),
    Video(&'a videos::Model),
}

/// Picks the preview by priority: video, then preview photo, then cover photo.
/// `None` means the card renders without media.
pub fn select_preview<'a>(
    video: Option<&'a videos::Model>,
    preview_photo: Option<&'a photos::Model>,
    cover_photo: Option<&'a photos::Model>,
) -> Option<PreviewSource<'a>> {
    video
        .map(PreviewSource::Video)
        .or_else(|| preview_photo.map(PreviewSource::Image))
        .or_else(|| cover_photo.map(PreviewSource::Image))
}

/// Where a card (or its image preview) navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    External(String),
    Internal(String),
}

impl LinkTarget {
    pub fn href(&self) -> &str {
        match self {
            LinkTarget::External(url) | LinkTarget::Internal(url) => url,
        }
    }
}

/// An explicit link always wins; otherwise internal items open their detail
/// page and external items without a link are not clickable.
pub fn resolve_link(is_external: bool, link: Option<&str>, slug: &str) -> Option<LinkTarget> {
    match link.filter(|l| !l.is_empty()) {
        Some(url) => Some(LinkTarget::External(url.to_string())),
        None if !is_external => Some(LinkTarget::Internal(format!("/actuality/{slug}"))),
        None => None,
    }
}

/// Card fields needed to render a preview.
#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    pub is_external: bool,
    pub is_pinned: bool,
    pub link: Option<&'a str>,
    pub slug: &'a str,
}

/// Rendering strategy for the selected preview.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewRender {
    Image {
        src: String,
        alt: String,
        target: Option<LinkTarget>,
        is_pinned: bool,
    },
    YouTube {
        embed_url: String,
        video_id: Option<String>,
        is_pinned: bool,
    },
    HostedVideo {
        link: Option<String>,
        thumbnail_link: Option<String>,
        is_pinned: bool,
    },
}

impl PreviewSource<'_> {
    pub fn render(&self, card: &CardContext<'_>, video: Option<&videos::Model>) -> PreviewRender {
        match *self {
            PreviewSource::Image(photo) => {
                // Image previews follow the attached video's link when present.
                let link = video.and_then(|v| v.link.as_deref()).or(card.link);
                PreviewRender::Image {
                    src: photo.link.clone(),
                    alt: photo.name.clone().unwrap_or_default(),
                    target: resolve_link(card.is_external, link, card.slug),
                    is_pinned: card.is_pinned,
                }
            }
            PreviewSource::Video(video) => match video.source {
                VideoSource::YouTube => PreviewRender::YouTube {
                    embed_url: youtube_embed_url(video),
                    video_id: video.video_id.clone(),
                    is_pinned: card.is_pinned,
                },
                VideoSource::Hosted => PreviewRender::HostedVideo {
                    link: video.link.clone(),
                    thumbnail_link: video.thumbnail_link.clone(),
                    is_pinned: card.is_pinned,
                },
            },
        }
    }
}

fn youtube_embed_url(video: &videos::Model) -> String {
    match video.video_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => format!("{YOUTUBE_EMBED_BASE}{id}"),
        None => video.link.clone().unwrap_or_default(),
    }
}

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use std::collections::HashMap;

use crate::api::error;

/// One binary part of a multipart request.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn size(&self) -> i64 {
        self.bytes.len() as i64
    }
}

/// Typed view over a request's file parts, built once before reconciliation
/// runs. The thumbnail arrives under the `image` field; update-path video
/// replacements under `modules[<m>][videos][<v>][file]`; anything else is
/// matched by original file name on the create path.
#[derive(Debug, Default)]
pub struct AttachmentSet {
    thumbnail: Option<Attachment>,
    positioned: HashMap<(usize, usize), Attachment>,
    named: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn insert(&mut self, field_name: &str, attachment: Attachment) {
        if field_name == "image" {
            self.thumbnail = Some(attachment);
        } else if let Some(position) = parse_video_field(field_name) {
            self.positioned.insert(position, attachment);
        } else {
            self.named.push(attachment);
        }
    }

    pub fn thumbnail(&self) -> Option<&Attachment> {
        self.thumbnail.as_ref()
    }

    pub fn at(&self, module: usize, video: usize) -> Option<&Attachment> {
        self.positioned.get(&(module, video))
    }

    pub fn by_name(&self, name: &str) -> Option<&Attachment> {
        self.named
            .iter()
            .find(|a| a.file_name == name)
            .or_else(|| self.positioned.values().find(|a| a.file_name == name))
    }

    /// Takes the sole attachment of a single-file request, whatever field
    /// name the client used.
    pub fn into_single(mut self) -> Option<Attachment> {
        if !self.named.is_empty() {
            return Some(self.named.remove(0));
        }
        if let Some(position) = self.positioned.keys().next().copied() {
            return self.positioned.remove(&position);
        }
        self.thumbnail
    }
}

/// Parses the `modules[<m>][videos][<v>][file]` field naming convention.
pub fn parse_video_field(field: &str) -> Option<(usize, usize)> {
    let rest = field.strip_prefix("modules[")?;
    let (module, rest) = rest.split_once(']')?;
    let rest = rest.strip_prefix("[videos][")?;
    let (video, rest) = rest.split_once(']')?;
    if rest != "[file]" {
        return None;
    }
    Some((module.parse().ok()?, video.parse().ok()?))
}

/// Drains a multipart payload into plain text fields and a typed
/// attachment set.
pub async fn collect(
    mut payload: Multipart,
) -> Result<(HashMap<String, String>, AttachmentSet), error::Error> {
    let mut fields = HashMap::new();
    let mut attachments = AttachmentSet::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| error::Error::bad_request("Malformed multipart payload"))?
    {
        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| error::Error::bad_request("Missing content disposition"))?;

        let name = content_disposition.get_name().unwrap_or_default().to_string();
        let file_name = content_disposition.get_filename().map(|f| f.to_string());
        let mime_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|_| error::Error::bad_request("Malformed multipart payload"))?
        {
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => {
                let mime_type = mime_type.unwrap_or_else(|| {
                    mime_guess::from_path(&file_name).first_or_octet_stream().to_string()
                });
                attachments.insert(&name, Attachment { file_name, mime_type, bytes });
            }
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| error::Error::bad_request("Form fields must be UTF-8"))?;
                fields.insert(name, value);
            }
        }
    }

    Ok((fields, attachments))
}

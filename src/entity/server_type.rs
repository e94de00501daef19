//! Server software types and their static metadata

use std::{fmt, str::FromStr};

use sea_orm::{Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  Hash,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerType {
  #[sea_orm(string_value = "VANILLA")]
  Vanilla,
  #[sea_orm(string_value = "PAPER")]
  Paper,
  #[sea_orm(string_value = "PUFFERFISH")]
  Pufferfish,
  #[sea_orm(string_value = "SPIGOT")]
  Spigot,
  #[sea_orm(string_value = "FOLIA")]
  Folia,
  #[sea_orm(string_value = "PURPUR")]
  Purpur,
  #[sea_orm(string_value = "WATERFALL")]
  Waterfall,
  #[sea_orm(string_value = "VELOCITY")]
  Velocity,
  #[sea_orm(string_value = "FABRIC")]
  Fabric,
  #[sea_orm(string_value = "BUNGEECORD")]
  BungeeCord,
  #[sea_orm(string_value = "QUILT")]
  Quilt,
  #[sea_orm(string_value = "FORGE")]
  Forge,
  #[sea_orm(string_value = "NEOFORGE")]
  NeoForge,
  #[sea_orm(string_value = "MOHIST")]
  Mohist,
  #[sea_orm(string_value = "ARCLIGHT")]
  Arclight,
  #[sea_orm(string_value = "SPONGE")]
  Sponge,
  #[sea_orm(string_value = "LEAVES")]
  Leaves,
  #[sea_orm(string_value = "CANVAS")]
  Canvas,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Modded,
  Plugins,
  Proxy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
  Spigot,
  Paper,
  Folia,
  Purpur,
  Fabric,
  Forge,
  Neoforge,
  Bungeecord,
  Velocity,
  Quilt,
  Sponge,
}

/// Constant per-type information, not stored in the catalog.
#[derive(Debug, Serialize)]
pub struct TypeInfo {
  pub name: &'static str,
  pub color: &'static str,
  pub homepage: &'static str,
  pub deprecated: bool,
  pub experimental: bool,
  pub description: &'static str,
  pub categories: &'static [Category],
  pub compatibility: &'static [Ecosystem],
}

impl ServerType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Vanilla => "VANILLA",
      Self::Paper => "PAPER",
      Self::Pufferfish => "PUFFERFISH",
      Self::Spigot => "SPIGOT",
      Self::Folia => "FOLIA",
      Self::Purpur => "PURPUR",
      Self::Waterfall => "WATERFALL",
      Self::Velocity => "VELOCITY",
      Self::Fabric => "FABRIC",
      Self::BungeeCord => "BUNGEECORD",
      Self::Quilt => "QUILT",
      Self::Forge => "FORGE",
      Self::NeoForge => "NEOFORGE",
      Self::Mohist => "MOHIST",
      Self::Arclight => "ARCLIGHT",
      Self::Sponge => "SPONGE",
      Self::Leaves => "LEAVES",
      Self::Canvas => "CANVAS",
    }
  }

  /// Types whose builds are keyed by a project version instead of a
  /// minecraft version.
  pub fn uses_project_versions(self) -> bool {
    matches!(self, Self::Velocity)
  }

  pub fn info(self) -> &'static TypeInfo {
    use Category::*;
    use Ecosystem as E;

    match self {
      Self::Vanilla => &TypeInfo {
        name: "Vanilla",
        color: "#3b8526",
        homepage: "https://minecraft.net/en-us/download/server",
        deprecated: false,
        experimental: false,
        description: "The official Minecraft server software.",
        categories: &[],
        compatibility: &[],
      },
      Self::Paper => &TypeInfo {
        name: "Paper",
        color: "#444444",
        homepage: "https://papermc.io/software/paper",
        deprecated: false,
        experimental: false,
        description: "A high performance fork of the Spigot Minecraft Server.",
        categories: &[Plugins],
        compatibility: &[E::Spigot, E::Paper],
      },
      Self::Pufferfish => &TypeInfo {
        name: "Pufferfish",
        color: "#ffa647",
        homepage: "https://pufferfish.host/downloads",
        deprecated: false,
        experimental: false,
        description: "A fork of Paper that aims to be even more performant.",
        categories: &[Plugins],
        compatibility: &[E::Spigot, E::Paper],
      },
      Self::Spigot => &TypeInfo {
        name: "Spigot",
        color: "#f7cf0d",
        homepage: "https://www.spigotmc.org",
        deprecated: false,
        experimental: false,
        description: "The original high performance fork of CraftBukkit.",
        categories: &[Plugins],
        compatibility: &[E::Spigot],
      },
      Self::Folia => &TypeInfo {
        name: "Folia",
        color: "#3fa33f",
        homepage: "https://papermc.io/software/folia",
        deprecated: false,
        experimental: true,
        description: "A fork of Paper that uses regional multithreading for high player counts.",
        categories: &[Plugins],
        compatibility: &[E::Folia],
      },
      Self::Purpur => &TypeInfo {
        name: "Purpur",
        color: "#c92bff",
        homepage: "https://purpurmc.org",
        deprecated: false,
        experimental: false,
        description: "A fork of Paper that aims to be more feature rich, adding patches from pufferfish too.",
        categories: &[Plugins],
        compatibility: &[E::Spigot, E::Paper, E::Purpur],
      },
      Self::Waterfall => &TypeInfo {
        name: "Waterfall",
        color: "#1b83d1",
        homepage: "https://papermc.io/software/waterfall",
        deprecated: true,
        experimental: false,
        description: "A fork of BungeeCord that aims to be more performant.",
        categories: &[Plugins, Proxy],
        compatibility: &[E::Bungeecord],
      },
      Self::Velocity => &TypeInfo {
        name: "Velocity",
        color: "#1bbae0",
        homepage: "https://papermc.io/software/velocity",
        deprecated: false,
        experimental: false,
        description: "A modern, high performance, extensible proxy server alternative for waterfall.",
        categories: &[Plugins, Proxy],
        compatibility: &[E::Velocity],
      },
      Self::Fabric => &TypeInfo {
        name: "Fabric",
        color: "#dbb87c",
        homepage: "https://fabricmc.net",
        deprecated: false,
        experimental: false,
        description: "A lightweight and modular Minecraft server software.",
        categories: &[Modded],
        compatibility: &[E::Fabric],
      },
      Self::BungeeCord => &TypeInfo {
        name: "BungeeCord",
        color: "#e1a32c",
        homepage: "https://www.spigotmc.org/wiki/bungeecord-installation",
        deprecated: false,
        experimental: false,
        description: "A proxy server software for Minecraft.",
        categories: &[Plugins, Proxy],
        compatibility: &[E::Bungeecord],
      },
      Self::Quilt => &TypeInfo {
        name: "Quilt",
        color: "#9722ff",
        homepage: "https://quiltmc.org",
        deprecated: false,
        experimental: true,
        description: "A fork of Fabric that aims to be more feature rich and have easier apis.",
        categories: &[Modded],
        compatibility: &[E::Fabric, E::Quilt],
      },
      Self::Forge => &TypeInfo {
        name: "Forge",
        color: "#dfa86a",
        homepage: "https://files.minecraftforge.net/net/minecraftforge/forge",
        deprecated: false,
        experimental: false,
        description: "The original Minecraft modding platform.",
        categories: &[Modded],
        compatibility: &[E::Forge],
      },
      Self::NeoForge => &TypeInfo {
        name: "NeoForge",
        color: "#d7742f",
        homepage: "https://neoforged.net",
        deprecated: false,
        experimental: false,
        description: "A cousin of Forge that aims to be more performant and have better modding apis.",
        categories: &[Modded],
        compatibility: &[E::Forge, E::Neoforge],
      },
      Self::Mohist => &TypeInfo {
        name: "Mohist",
        color: "#2c73db",
        homepage: "https://mohistmc.com/software/mohist",
        deprecated: false,
        experimental: false,
        description: "A variation of forge/neoforge that allows loading spigot plugins next to mods.",
        categories: &[Modded, Plugins],
        compatibility: &[E::Forge, E::Spigot, E::Paper],
      },
      Self::Arclight => &TypeInfo {
        name: "Arclight",
        color: "#f4b6e2",
        homepage: "https://github.com/IzzelAliz/Arclight",
        deprecated: false,
        experimental: false,
        description: "A Bukkit server implementation utilizing Mixins for modding support.",
        categories: &[Modded, Plugins],
        compatibility: &[E::Fabric, E::Spigot, E::Forge, E::Neoforge],
      },
      Self::Sponge => &TypeInfo {
        name: "Sponge",
        color: "#f7cf0d",
        homepage: "https://www.spongepowered.org",
        deprecated: false,
        experimental: false,
        description: "A modding platform for Minecraft.",
        categories: &[Modded],
        compatibility: &[E::Sponge],
      },
      Self::Leaves => &TypeInfo {
        name: "Leaves",
        color: "#20c45b",
        homepage: "https://leavesmc.org/software/leaves",
        deprecated: false,
        experimental: false,
        description: "A fork of paper that aims to restore vanilla behavior and add new features.",
        categories: &[Plugins],
        compatibility: &[E::Spigot, E::Paper],
      },
      Self::Canvas => &TypeInfo {
        name: "Canvas",
        color: "#5b4bd1",
        homepage: "https://canvasmc.io",
        deprecated: false,
        experimental: true,
        description: "A fork of Folia that focuses on performance and stability.",
        categories: &[Plugins],
        compatibility: &[E::Spigot, E::Paper, E::Folia],
      },
    }
  }
}

impl fmt::Display for ServerType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown server type `{0}`")]
pub struct UnknownType(pub String);

impl FromStr for ServerType {
  type Err = UnknownType;

  /// Case-insensitive, user input arrives as `paper` as often as `PAPER`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Self::iter()
      .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| UnknownType(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_is_case_insensitive() {
    assert_eq!("paper".parse::<ServerType>(), Ok(ServerType::Paper));
    assert_eq!(" NeoForge ".parse::<ServerType>(), Ok(ServerType::NeoForge));
    assert!("bukkit".parse::<ServerType>().is_err());
  }

  #[test]
  fn unknown_type_is_an_error() {
    let err: Box<dyn std::error::Error> =
      Box::new("bukkit".parse::<ServerType>().unwrap_err());
    assert_eq!(err.to_string(), "unknown server type `bukkit`");
  }

  #[test]
  fn serde_matches_database_values() {
    for ty in ServerType::iter() {
      let serialized = json::to_value(ty).unwrap();
      assert_eq!(serialized, json::Value::String(ty.as_str().into()));
      assert_eq!(ty.to_value(), ty.as_str());
    }
  }

  #[test]
  fn only_velocity_is_project_keyed() {
    let keyed: Vec<_> =
      ServerType::iter().filter(|ty| ty.uses_project_versions()).collect();
    assert_eq!(keyed, vec![ServerType::Velocity]);
  }
}
